//! Meeting reservations.
//!
//! Master reservations are only created through the dedicated reservation
//! endpoint, which also creates the per-event rows.

use crate::models::resource::{Access, Cascade, FieldDef, Ops, ResourceDef};

pub static MEETING_RESERVATIONS: ResourceDef = ResourceDef {
    table: "meeting_reservations",
    singular: "meeting_reservation",
    fields: &[
        FieldDef::belongs_to("meeting_id", "meetings").required().exact(),
        FieldDef::belongs_to("badge_id", "badges").required().exact(),
        FieldDef::belongs_to("swimmer_id", "swimmers").required().exact(),
        FieldDef::belongs_to("team_id", "teams").required().exact(),
        FieldDef::belongs_to("user_id", "users").exact(),
        FieldDef::flag("not_paid"),
        FieldDef::flag("confirmed").exact(),
        FieldDef::text("notes"),
    ],
    access: Access::crud("MeetingReservation"),
    ops: Ops::NO_CREATE,
    cascades: &[Cascade {
        table: "meeting_event_reservations",
        foreign_key: "meeting_reservation_id",
    }],
    before_save: None,
};

pub static MEETING_EVENT_RESERVATIONS: ResourceDef = ResourceDef {
    table: "meeting_event_reservations",
    singular: "meeting_event_reservation",
    fields: &[
        FieldDef::belongs_to("meeting_reservation_id", "meeting_reservations").required().exact(),
        FieldDef::belongs_to("meeting_id", "meetings").required().exact(),
        FieldDef::belongs_to("meeting_event_id", "meeting_events").required().exact(),
        FieldDef::belongs_to("badge_id", "badges").exact(),
        FieldDef::belongs_to("swimmer_id", "swimmers").exact(),
        FieldDef::belongs_to("team_id", "teams").exact(),
        FieldDef::belongs_to("user_id", "users"),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
        FieldDef::flag("accepted").exact(),
    ],
    access: Access::crud("MeetingReservation"),
    ops: Ops::NO_CREATE,
    cascades: &[],
    before_save: None,
};
