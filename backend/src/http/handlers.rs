//! Generic resource handlers plus health and status.
//!
//! Resource handlers receive their [`ResourceDef`] through an `Extension`
//! layered on the per-resource router, so one set of functions serves every
//! registered resource.

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde_json::Value;
use std::collections::HashMap;

use super::auth::authorize;
use super::dto::{CreatedResponse, HealthResponse, StatusResponse};
use super::error::AppError;
use super::pagination::{page_request, pagination_headers};
use super::params::merge_params;
use super::state::AppState;
use crate::db::models::Record;
use crate::db::repository::{EntityRepository, SettingsRepository};
use crate::models::validation::filter_params;
use crate::models::ResourceDef;
use crate::services::entities;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v3".to_string(),
        database: db_status,
        pool: state.repository.pool_stats(),
    }))
}

/// GET /api/v3/status
///
/// Public; clients poll it to learn about maintenance windows.
pub async fn status(State(state): State<AppState>) -> HandlerResult<StatusResponse> {
    Ok(Json(StatusResponse {
        msg: "OK".to_string(),
        maintenance: state.repository.maintenance().await?,
    }))
}

// =============================================================================
// Resource CRUD
// =============================================================================

/// GET /api/v3/{singular}/{id}
pub async fn show(
    State(state): State<AppState>,
    Extension(def): Extension<&'static ResourceDef>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> HandlerResult<Record> {
    let user = authorize(&state, &headers, def.access.read).await?;
    entities::show(state.repository.as_ref(), def, id, &user)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", def.singular, id)))
}

/// GET /api/v3/{plural}
pub async fn list(
    State(state): State<AppState>,
    Extension(def): Extension<&'static ResourceDef>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<HashMap<String, String>>,
) -> Result<(HeaderMap, Json<Vec<Record>>), AppError> {
    authorize(&state, &headers, def.access.read).await?;
    let params = filter_params(def, &query)?;
    let request = page_request(&query, &state.config)?;

    let page = entities::list(state.repository.as_ref(), def, &params, request).await?;
    let headers = pagination_headers(&uri, &page);
    Ok((headers, Json(page.items)))
}

/// POST /api/v3/{singular}
pub async fn create(
    State(state): State<AppState>,
    Extension(def): Extension<&'static ResourceDef>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let user = authorize(&state, &headers, def.access.write).await?;
    let params = merge_params(query, &body)?;
    let record = entities::create(state.repository.as_ref(), def, &params, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(Value::Object(record))),
    ))
}

/// PUT /api/v3/{singular}/{id}
///
/// Answers `false` when the row does not exist.
pub async fn update(
    State(state): State<AppState>,
    Extension(def): Extension<&'static ResourceDef>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> HandlerResult<bool> {
    let user = authorize(&state, &headers, def.access.write).await?;
    let params = merge_params(query, &body)?;
    let updated = entities::update(state.repository.as_ref(), def, id, &params, user.id).await?;
    Ok(Json(updated))
}

/// DELETE /api/v3/{singular}/{id}
///
/// Answers `false` when the row does not exist.
pub async fn destroy(
    State(state): State<AppState>,
    Extension(def): Extension<&'static ResourceDef>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> HandlerResult<bool> {
    authorize(&state, &headers, def.access.delete).await?;
    let deleted = entities::destroy(state.repository.as_ref(), def, id).await?;
    Ok(Json(deleted))
}
