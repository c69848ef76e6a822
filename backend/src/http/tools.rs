//! GET /api/v3/tools/find_entry_time

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use std::collections::HashMap;

use super::auth::check_jwt_session;
use super::error::AppError;
use super::params::{merge_params, required_int, str_param};
use super::state::AppState;
use crate::models::lookup::{is_relay_event, lookup_entry};
use crate::models::validation::ValidationErrors;
use crate::services::{find_entry_time as lookup_entry_time, EntryTime, EntryTimeType};

/// Suggested entry time for a swimmer, event type and pool type.
///
/// `entry_time_type` is `personal` (default, best result) or `last_race`.
pub async fn find_entry_time(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<EntryTime>, AppError> {
    check_jwt_session(&state, &headers).await?;
    let params = merge_params(query, &Default::default())?;

    let swimmer_id = required_int(&params, "swimmer_id")?;
    let event_type_id = required_int(&params, "event_type_id")?;
    let pool_type_id = required_int(&params, "pool_type_id")?;
    let entry_time_type: EntryTimeType = str_param(&params, "entry_time_type")
        .unwrap_or_default()
        .parse()
        .map_err(AppError::BadRequest)?;

    let mut errors = ValidationErrors::new();
    if lookup_entry("event_types", event_type_id).is_none() {
        errors.add("event_type_id", "is not included in the list");
    } else if is_relay_event(event_type_id) {
        errors.add("event_type_id", "must be an individual event");
    }
    if lookup_entry("pool_types", pool_type_id).is_none() {
        errors.add("pool_type_id", "is not included in the list");
    }
    errors.into_result()?;

    let found = lookup_entry_time(
        state.repository.as_ref(),
        swimmer_id,
        event_type_id,
        pool_type_id,
        entry_time_type,
    )
    .await?;
    Ok(Json(found))
}
