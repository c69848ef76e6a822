//! GET /api/v3/lookup/{entity_name}

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use super::auth::check_jwt_session;
use super::error::AppError;
use super::state::AppState;
use crate::models::lookup::{lookup_table, LookupEntry};

pub async fn lookup_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entity_name): Path<String>,
) -> Result<Json<&'static [LookupEntry]>, AppError> {
    check_jwt_session(&state, &headers).await?;
    lookup_table(&entity_name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("unknown lookup entity {}", entity_name)))
}
