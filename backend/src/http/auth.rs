//! Request authentication.

use axum::http::HeaderMap;

use super::error::AppError;
use super::state::AppState;
use crate::auth::{load_user, AuthError, GrantChecker, User};
use crate::models::Permission;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get("Authorization")?.to_str().ok()?;
    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the session user from `Authorization: Bearer <jwt>`.
pub async fn check_jwt_session(state: &AppState, headers: &HeaderMap) -> Result<User, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = state.jwt.decode(token)?;
    load_user(state.repository.as_ref(), claims.user_id)
        .await?
        .ok_or(AuthError::UnknownUser(claims.user_id))
}

/// Authenticate the request and check `permission` for its user.
pub async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    permission: Permission,
) -> Result<User, AppError> {
    let user = check_jwt_session(state, headers).await?;
    GrantChecker::new(state.repository.as_ref(), &user)
        .require(permission)
        .await?;
    Ok(user)
}
