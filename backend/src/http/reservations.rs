//! POST /api/v3/meeting_reservation

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

use super::auth::check_jwt_session;
use super::dto::CreatedResponse;
use super::error::AppError;
use super::params::{merge_params, required_int};
use super::state::AppState;
use crate::services::create_reservation;

pub async fn create_meeting_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let user = check_jwt_session(&state, &headers).await?;
    let params = merge_params(query, &body)?;
    let badge_id = required_int(&params, "badge_id")?;
    let meeting_id = required_int(&params, "meeting_id")?;

    let reservation =
        create_reservation(state.repository.as_ref(), &user, badge_id, meeting_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(Value::Object(reservation))),
    ))
}
