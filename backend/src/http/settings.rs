//! Admin-only application settings.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::auth::authorize;
use super::error::AppError;
use super::params::{merge_params, required_str};
use super::state::AppState;
use crate::db::repository::SettingsRepository;
use crate::models::Permission;

/// GET /api/v3/settings
pub async fn list_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Map<String, Value>>, AppError> {
    authorize(&state, &headers, Permission::Admin).await?;
    Ok(Json(state.repository.all_settings().await?))
}

/// GET /api/v3/setting/{group}
pub async fn show_setting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group): Path<String>,
) -> Result<Json<Map<String, Value>>, AppError> {
    authorize(&state, &headers, Permission::Admin).await?;
    Ok(Json(state.repository.settings_for(&group).await?))
}

/// PUT /api/v3/setting/{group} with `key` and `value`.
///
/// A textual `value` holding JSON (`true`, `42`, ...) is stored decoded.
pub async fn update_setting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<bool>, AppError> {
    let user = authorize(&state, &headers, Permission::Admin).await?;
    let params = merge_params(query, &body)?;
    let key = required_str(&params, "key")?;
    let value = match params.get("value") {
        Some(Value::String(raw)) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        }
        Some(other) => other.clone(),
        None => Value::Null,
    };

    state.repository.put_setting(&group, &key, value).await?;
    tracing::info!(user_id = user.id, group = %group, key = %key, "setting updated");
    Ok(Json(true))
}
