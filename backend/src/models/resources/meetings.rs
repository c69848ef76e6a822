//! Seasons, meetings and their structure (sessions, events, programs).

use crate::models::resource::{Access, Cascade, FieldDef, Ops, ResourceDef};

pub static SEASONS: ResourceDef = ResourceDef {
    table: "seasons",
    singular: "season",
    fields: &[
        FieldDef::text("description").required().like(),
        FieldDef::date("begin_date").required().exact(),
        FieldDef::date("end_date").required().exact(),
        FieldDef::lookup("season_type_id", "season_types").required().exact(),
        FieldDef::text("header_year").exact(),
        FieldDef::int("edition"),
        FieldDef::lookup("edition_type_id", "edition_types"),
        FieldDef::lookup("timing_type_id", "timing_types"),
        FieldDef::text("rules"),
        FieldDef::flag("individual_rank"),
        FieldDef::decimal("badge_fee"),
    ],
    access: Access::crud("Season"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static MEETINGS: ResourceDef = ResourceDef {
    table: "meetings",
    singular: "meeting",
    fields: &[
        FieldDef::text("description").required().like(),
        FieldDef::text("code").exact(),
        FieldDef::text("header_year").exact(),
        FieldDef::date("header_date").exact(),
        FieldDef::belongs_to("season_id", "seasons").required().exact(),
        FieldDef::int("edition"),
        FieldDef::lookup("edition_type_id", "edition_types"),
        FieldDef::lookup("timing_type_id", "timing_types"),
        FieldDef::date("entry_deadline"),
        FieldDef::flag("cancelled").exact(),
        FieldDef::flag("confirmed").exact(),
        FieldDef::flag("results_acquired"),
        FieldDef::int("max_individual_events"),
        FieldDef::int("max_individual_events_per_session"),
        FieldDef::belongs_to("home_team_id", "teams"),
        FieldDef::decimal("meeting_fee"),
        FieldDef::text("notes"),
    ],
    access: Access::crud("Meeting"),
    ops: Ops::ALL,
    cascades: &[Cascade {
        table: "meeting_sessions",
        foreign_key: "meeting_id",
    }],
    before_save: None,
};

pub static MEETING_SESSIONS: ResourceDef = ResourceDef {
    table: "meeting_sessions",
    singular: "meeting_session",
    fields: &[
        FieldDef::belongs_to("meeting_id", "meetings").required().exact(),
        FieldDef::int("session_order").required(),
        FieldDef::date("scheduled_date").required().exact(),
        FieldDef::text("description").like(),
        FieldDef::belongs_to("swimming_pool_id", "swimming_pools").exact(),
        FieldDef::lookup("day_part_type_id", "day_part_types"),
        FieldDef::text("warm_up_time"),
        FieldDef::text("begin_time"),
    ],
    access: Access::crud("MeetingSession"),
    ops: Ops::ALL,
    cascades: &[Cascade {
        table: "meeting_events",
        foreign_key: "meeting_session_id",
    }],
    before_save: None,
};

pub static MEETING_EVENTS: ResourceDef = ResourceDef {
    table: "meeting_events",
    singular: "meeting_event",
    fields: &[
        FieldDef::belongs_to("meeting_session_id", "meeting_sessions").required().exact(),
        FieldDef::lookup("event_type_id", "event_types").required().exact(),
        FieldDef::lookup("heat_type_id", "heat_types").exact(),
        FieldDef::int("event_order"),
        FieldDef::text("begin_time"),
        FieldDef::flag("out_of_race"),
        FieldDef::flag("split_gender_start_list"),
    ],
    access: Access::crud("MeetingEvent"),
    ops: Ops::ALL,
    cascades: &[Cascade {
        table: "meeting_programs",
        foreign_key: "meeting_event_id",
    }],
    before_save: None,
};

pub static MEETING_PROGRAMS: ResourceDef = ResourceDef {
    table: "meeting_programs",
    singular: "meeting_program",
    fields: &[
        FieldDef::belongs_to("meeting_event_id", "meeting_events").required().exact(),
        FieldDef::belongs_to("category_type_id", "category_types").required().exact(),
        FieldDef::lookup("gender_type_id", "gender_types").required().exact(),
        FieldDef::lookup("pool_type_id", "pool_types").exact(),
        FieldDef::int("event_order"),
        FieldDef::belongs_to("standard_timing_id", "standard_timings"),
    ],
    access: Access::crud("MeetingProgram"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static CALENDARS: ResourceDef = ResourceDef {
    table: "calendars",
    singular: "calendar",
    fields: &[
        FieldDef::text("scheduled_date"),
        FieldDef::text("meeting_name").like(),
        FieldDef::text("meeting_code").exact(),
        FieldDef::belongs_to("meeting_id", "meetings").exact(),
        FieldDef::belongs_to("season_id", "seasons").exact(),
        FieldDef::text("year").exact(),
        FieldDef::text("month").exact(),
        FieldDef::flag("cancelled").exact(),
        FieldDef::text("results_link"),
        FieldDef::text("manifest_link"),
    ],
    access: Access::crud("Calendar"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};
