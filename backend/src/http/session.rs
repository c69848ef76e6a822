//! POST /api/v3/session

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;

use super::dto::SessionResponse;
use super::error::AppError;
use super::params::{merge_params, str_param};
use super::state::AppState;
use crate::auth::{authenticate, AuthError, GrantChecker};
use crate::db::repository::SettingsRepository;

/// Create a session token.
///
/// Parameters: `e` (email), `p` (password), `t` (static client token).
/// While maintenance mode is on only admins may log in.
pub async fn create_session(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let params = merge_params(query, &body)?;
    let static_token = str_param(&params, "t").unwrap_or_default();
    state.jwt.verify_static(&static_token)?;

    let email = str_param(&params, "e").unwrap_or_default();
    let password = str_param(&params, "p").unwrap_or_default();
    let repo = state.repository.as_ref();
    let user = authenticate(repo, &email, &password).await?;

    if repo.maintenance().await? && !GrantChecker::new(repo, &user).admin().await? {
        tracing::info!(user_id = user.id, "session refused during maintenance");
        return Err(AuthError::Maintenance.into());
    }

    let jwt = state.jwt.encode(user.id)?;
    tracing::info!(user_id = user.id, "session created");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            msg: "OK".to_string(),
            jwt,
        }),
    ))
}
