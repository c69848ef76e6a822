//! Results, laps, entries and standard timings.

use crate::models::resource::{Access, Cascade, FieldDef, Ops, ResourceDef};

pub static MEETING_INDIVIDUAL_RESULTS: ResourceDef = ResourceDef {
    table: "meeting_individual_results",
    singular: "meeting_individual_result",
    fields: &[
        FieldDef::belongs_to("meeting_program_id", "meeting_programs").required().exact(),
        FieldDef::belongs_to("swimmer_id", "swimmers").required().exact(),
        FieldDef::belongs_to("team_id", "teams").required().exact(),
        FieldDef::belongs_to("team_affiliation_id", "team_affiliations").exact(),
        FieldDef::belongs_to("badge_id", "badges").exact(),
        FieldDef::int("rank"),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
        FieldDef::flag("disqualified").exact(),
        FieldDef::lookup("disqualification_code_type_id", "disqualification_code_types"),
        FieldDef::decimal("standard_points"),
        FieldDef::decimal("meeting_points"),
        FieldDef::decimal("goggle_cup_points"),
        FieldDef::decimal("reaction_time"),
        FieldDef::flag("personal_best"),
        FieldDef::flag("season_type_best"),
    ],
    access: Access::crud("MeetingIndividualResult"),
    ops: Ops::ALL,
    cascades: &[Cascade {
        table: "laps",
        foreign_key: "meeting_individual_result_id",
    }],
    before_save: None,
};

pub static MEETING_RELAY_RESULTS: ResourceDef = ResourceDef {
    table: "meeting_relay_results",
    singular: "meeting_relay_result",
    fields: &[
        FieldDef::belongs_to("meeting_program_id", "meeting_programs").required().exact(),
        FieldDef::belongs_to("team_id", "teams").required().exact(),
        FieldDef::belongs_to("team_affiliation_id", "team_affiliations").exact(),
        FieldDef::text("relay_code").like(),
        FieldDef::int("rank"),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
        FieldDef::flag("disqualified").exact(),
        FieldDef::lookup("disqualification_code_type_id", "disqualification_code_types"),
        FieldDef::decimal("standard_points"),
        FieldDef::decimal("meeting_points"),
        FieldDef::decimal("reaction_time"),
    ],
    access: Access::crud("MeetingRelayResult"),
    ops: Ops::ALL,
    cascades: &[
        Cascade {
            table: "meeting_relay_swimmers",
            foreign_key: "meeting_relay_result_id",
        },
        Cascade {
            table: "relay_laps",
            foreign_key: "meeting_relay_result_id",
        },
    ],
    before_save: None,
};

pub static MEETING_RELAY_SWIMMERS: ResourceDef = ResourceDef {
    table: "meeting_relay_swimmers",
    singular: "meeting_relay_swimmer",
    fields: &[
        FieldDef::belongs_to("meeting_relay_result_id", "meeting_relay_results").required().exact(),
        FieldDef::belongs_to("swimmer_id", "swimmers").required().exact(),
        FieldDef::belongs_to("badge_id", "badges").exact(),
        FieldDef::lookup("stroke_type_id", "stroke_types").required(),
        FieldDef::int("relay_order").required(),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
        FieldDef::decimal("reaction_time"),
    ],
    access: Access::crud("MeetingRelaySwimmer"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static LAPS: ResourceDef = ResourceDef {
    table: "laps",
    singular: "lap",
    fields: &[
        FieldDef::belongs_to("meeting_individual_result_id", "meeting_individual_results")
            .required()
            .exact(),
        FieldDef::belongs_to("meeting_program_id", "meeting_programs").exact(),
        FieldDef::belongs_to("swimmer_id", "swimmers").exact(),
        FieldDef::belongs_to("team_id", "teams").exact(),
        FieldDef::int("length_in_meters").required(),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
        FieldDef::int("minutes_from_start"),
        FieldDef::int("seconds_from_start"),
        FieldDef::int("hundredths_from_start"),
        FieldDef::decimal("reaction_time"),
    ],
    access: Access::crud("Lap"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static RELAY_LAPS: ResourceDef = ResourceDef {
    table: "relay_laps",
    singular: "relay_lap",
    fields: &[
        FieldDef::belongs_to("meeting_relay_result_id", "meeting_relay_results").required().exact(),
        FieldDef::belongs_to("meeting_relay_swimmer_id", "meeting_relay_swimmers").exact(),
        FieldDef::belongs_to("swimmer_id", "swimmers").exact(),
        FieldDef::belongs_to("team_id", "teams").exact(),
        FieldDef::int("length_in_meters").required(),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
    ],
    access: Access::crud("RelayLap"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static MEETING_ENTRIES: ResourceDef = ResourceDef {
    table: "meeting_entries",
    singular: "meeting_entry",
    fields: &[
        FieldDef::belongs_to("meeting_program_id", "meeting_programs").required().exact(),
        FieldDef::belongs_to("swimmer_id", "swimmers").exact(),
        FieldDef::belongs_to("team_id", "teams").exact(),
        FieldDef::belongs_to("team_affiliation_id", "team_affiliations").exact(),
        FieldDef::belongs_to("badge_id", "badges").exact(),
        FieldDef::lookup("entry_time_type_id", "entry_time_types"),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
        FieldDef::int("start_list_number"),
        FieldDef::int("lane_number"),
        FieldDef::int("heat_number"),
    ],
    access: Access::crud("MeetingEntry"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static STANDARD_TIMINGS: ResourceDef = ResourceDef {
    table: "standard_timings",
    singular: "standard_timing",
    fields: &[
        FieldDef::belongs_to("season_id", "seasons").required().exact(),
        FieldDef::lookup("event_type_id", "event_types").required().exact(),
        FieldDef::lookup("pool_type_id", "pool_types").required().exact(),
        FieldDef::lookup("gender_type_id", "gender_types").required().exact(),
        FieldDef::belongs_to("category_type_id", "category_types").required().exact(),
        FieldDef::int("minutes"),
        FieldDef::int("seconds"),
        FieldDef::int("hundredths"),
    ],
    access: Access::crud("StandardTiming"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};
