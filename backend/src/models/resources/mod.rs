//! Registry of every API resource.

mod admin;
mod meetings;
mod people;
mod places;
mod reservations;
mod results;

pub use admin::{ADMIN_GRANTS, IMPORT_QUEUES, USERS};
pub use meetings::{CALENDARS, MEETINGS, MEETING_EVENTS, MEETING_PROGRAMS, MEETING_SESSIONS, SEASONS};
pub use people::{
    BADGES, BADGE_PAYMENTS, CATEGORY_TYPES, SWIMMERS, TEAMS, TEAM_AFFILIATIONS, TEAM_MANAGERS,
};
pub use places::{CITIES, SWIMMING_POOLS};
pub use reservations::{MEETING_EVENT_RESERVATIONS, MEETING_RESERVATIONS};
pub use results::{
    LAPS, MEETING_ENTRIES, MEETING_INDIVIDUAL_RESULTS, MEETING_RELAY_RESULTS,
    MEETING_RELAY_SWIMMERS, RELAY_LAPS, STANDARD_TIMINGS,
};

use super::resource::ResourceDef;

/// Every mounted resource, in routing order.
pub static RESOURCES: &[&ResourceDef] = &[
    &SEASONS,
    &MEETINGS,
    &MEETING_SESSIONS,
    &MEETING_EVENTS,
    &MEETING_PROGRAMS,
    &MEETING_INDIVIDUAL_RESULTS,
    &MEETING_RELAY_RESULTS,
    &MEETING_RELAY_SWIMMERS,
    &LAPS,
    &RELAY_LAPS,
    &MEETING_ENTRIES,
    &MEETING_RESERVATIONS,
    &MEETING_EVENT_RESERVATIONS,
    &SWIMMERS,
    &TEAMS,
    &TEAM_AFFILIATIONS,
    &TEAM_MANAGERS,
    &BADGES,
    &BADGE_PAYMENTS,
    &CATEGORY_TYPES,
    &STANDARD_TIMINGS,
    &SWIMMING_POOLS,
    &CITIES,
    &CALENDARS,
    &USERS,
    &ADMIN_GRANTS,
    &IMPORT_QUEUES,
];

/// Resource stored in `table`.
pub fn resource(table: &str) -> Option<&'static ResourceDef> {
    RESOURCES.iter().copied().find(|def| def.table == table)
}
