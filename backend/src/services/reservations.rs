//! Meeting reservations: one master row per badge and meeting, plus one
//! event reservation for every event of the meeting.

use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::{AuthError, GrantChecker, User};
use crate::db::filter::FilterSet;
use crate::db::models::{record_i64, record_id, NewFamily, PageRequest, Record};
use crate::db::repository::{EntityRepository, FullRepository, RepositoryError, RepositoryResult};
use crate::models::resources::MEETING_RESERVATIONS;
use crate::models::validation::ValidationErrors;

/// Grant entity covering master and event reservations.
pub const RESERVATION_GRANT: &str = "MeetingReservation";

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ValidationErrors> for ReservationError {
    fn from(errors: ValidationErrors) -> Self {
        ReservationError::Invalid(errors)
    }
}

/// Events of a meeting, across all of its sessions, in schedule order.
pub async fn meeting_events(
    repo: &dyn FullRepository,
    meeting_id: i64,
) -> RepositoryResult<Vec<Record>> {
    let sessions = repo
        .list(
            "meeting_sessions",
            &FilterSet::new().exact("meeting_id", Value::from(meeting_id)),
            PageRequest::all(),
        )
        .await?;

    let mut events = Vec::new();
    for session in &sessions.items {
        let Some(session_id) = record_id(session) else {
            continue;
        };
        let session_order = record_i64(session, "session_order").unwrap_or(0);
        let rows = repo
            .list(
                "meeting_events",
                &FilterSet::new().exact("meeting_session_id", Value::from(session_id)),
                PageRequest::all(),
            )
            .await?;
        events.extend(rows.items.into_iter().map(|event| (session_order, event)));
    }

    events.sort_by_key(|(session_order, event)| {
        (
            *session_order,
            record_i64(event, "event_order").unwrap_or(0),
            record_id(event).unwrap_or(0),
        )
    });
    Ok(events.into_iter().map(|(_, event)| event).collect())
}

/// Reserve `badge_id` for `meeting_id` on behalf of `user`.
///
/// Allowed for a CRUD grant on reservations or for the manager of the
/// badge's team affiliation. Returns the master row with its event
/// reservations nested under `meeting_event_reservations`.
pub async fn create_reservation(
    repo: &dyn FullRepository,
    user: &User,
    badge_id: i64,
    meeting_id: i64,
) -> Result<Record, ReservationError> {
    let Some(badge) = repo.find("badges", badge_id).await? else {
        return Err(ValidationErrors::single("badge_id", "must exist").into());
    };

    let checker = GrantChecker::new(repo, user);
    let manages = match record_i64(&badge, "team_affiliation_id") {
        Some(affiliation_id) => checker.team_manager(affiliation_id).await?,
        None => false,
    };
    if !manages {
        checker.require(crate::models::Permission::Crud(RESERVATION_GRANT)).await?;
    }

    if !repo.exists("meetings", meeting_id).await? {
        return Err(ValidationErrors::single("meeting_id", "must exist").into());
    }

    let swimmer_id = record_i64(&badge, "swimmer_id");
    let team_id = record_i64(&badge, "team_id");
    let children = meeting_events(repo, meeting_id)
        .await?
        .iter()
        .map(|event| {
            as_record(json!({
                "meeting_id": meeting_id,
                "meeting_event_id": record_id(event),
                "badge_id": badge_id,
                "swimmer_id": swimmer_id,
                "team_id": team_id,
                "user_id": user.id,
                "minutes": 0,
                "seconds": 0,
                "hundredths": 0,
                "accepted": false,
            }))
        })
        .collect();

    let family = NewFamily {
        entity: MEETING_RESERVATIONS.table.to_string(),
        attrs: as_record(json!({
            "meeting_id": meeting_id,
            "badge_id": badge_id,
            "swimmer_id": swimmer_id,
            "team_id": team_id,
            "user_id": user.id,
            "not_paid": false,
            "confirmed": false,
        })),
        unique: FilterSet::new()
            .exact("badge_id", Value::from(badge_id))
            .exact("meeting_id", Value::from(meeting_id)),
        child_entity: "meeting_event_reservations".to_string(),
        foreign_key: "meeting_reservation_id".to_string(),
        children,
    };
    let Some(stored) = repo.insert_family(family).await? else {
        return Err(ValidationErrors::single("badge_id", "has already been reserved for this meeting").into());
    };
    let master_id = record_id(&stored.parent).unwrap_or_default();
    let event_rows: Vec<Value> = stored.children.into_iter().map(Value::Object).collect();

    tracing::info!(
        reservation_id = master_id,
        badge_id,
        meeting_id,
        events = event_rows.len(),
        "meeting reservation created"
    );

    let mut result = stored.parent;
    result.insert("meeting_event_reservations".to_string(), Value::Array(event_rows));
    Ok(result)
}

fn as_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}
