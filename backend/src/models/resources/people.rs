//! Swimmers, teams and their season affiliations.

use serde_json::Value;

use crate::db::models::{record_str, Record};
use crate::models::resource::{Access, Cascade, FieldDef, Ops, ResourceDef, SaveContext};
use crate::models::validation::ValidationErrors;

pub static SWIMMERS: ResourceDef = ResourceDef {
    table: "swimmers",
    singular: "swimmer",
    fields: &[
        FieldDef::text("last_name").required().like(),
        FieldDef::text("first_name").required().like(),
        FieldDef::text("complete_name").like().derived(),
        FieldDef::int("year_of_birth").required().exact(),
        FieldDef::lookup("gender_type_id", "gender_types").required().exact(),
        FieldDef::belongs_to("associated_user_id", "users").exact(),
        FieldDef::text("nickname").like(),
        FieldDef::text("e_mail"),
        FieldDef::flag("year_guessed"),
    ],
    access: Access::crud_admin_delete("Swimmer"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: Some(swimmer_complete_name),
};

/// `complete_name` is always `"<last_name> <first_name>"`.
fn swimmer_complete_name(attrs: &mut Record, ctx: &SaveContext<'_>) -> Result<(), ValidationErrors> {
    let pick = |field: &str| {
        record_str(attrs, field)
            .or_else(|| ctx.existing.and_then(|row| record_str(row, field)))
            .unwrap_or_default()
            .trim()
            .to_string()
    };
    let (last, first) = (pick("last_name"), pick("first_name"));
    if attrs.contains_key("last_name") || attrs.contains_key("first_name") || ctx.is_create() {
        let complete = format!("{} {}", last, first).trim().to_string();
        attrs.insert("complete_name".to_string(), Value::String(complete));
    }
    Ok(())
}

pub static TEAMS: ResourceDef = ResourceDef {
    table: "teams",
    singular: "team",
    fields: &[
        FieldDef::text("name").required().like(),
        FieldDef::text("editable_name").like(),
        FieldDef::text("address"),
        FieldDef::text("zip"),
        FieldDef::text("phone_mobile"),
        FieldDef::text("e_mail"),
        FieldDef::text("contact_name"),
        FieldDef::belongs_to("city_id", "cities").exact(),
        FieldDef::text("home_page_url"),
        FieldDef::text("notes"),
    ],
    access: Access::crud("Team"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static TEAM_AFFILIATIONS: ResourceDef = ResourceDef {
    table: "team_affiliations",
    singular: "team_affiliation",
    fields: &[
        FieldDef::belongs_to("team_id", "teams").required().exact(),
        FieldDef::belongs_to("season_id", "seasons").required().exact(),
        FieldDef::text("name").required().like(),
        FieldDef::text("number").exact(),
        FieldDef::flag("compute_gogglecup"),
        FieldDef::flag("autofilled"),
    ],
    access: Access::crud("TeamAffiliation"),
    ops: Ops::ALL,
    cascades: &[Cascade {
        table: "team_managers",
        foreign_key: "team_affiliation_id",
    }],
    before_save: None,
};

pub static TEAM_MANAGERS: ResourceDef = ResourceDef {
    table: "team_managers",
    singular: "team_manager",
    fields: &[
        FieldDef::belongs_to("team_affiliation_id", "team_affiliations").required().exact(),
        FieldDef::belongs_to("user_id", "users").required().exact(),
    ],
    access: Access::admin(),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static BADGES: ResourceDef = ResourceDef {
    table: "badges",
    singular: "badge",
    fields: &[
        FieldDef::text("number").required().like(),
        FieldDef::belongs_to("swimmer_id", "swimmers").required().exact(),
        FieldDef::belongs_to("team_id", "teams").required().exact(),
        FieldDef::belongs_to("season_id", "seasons").required().exact(),
        FieldDef::belongs_to("team_affiliation_id", "team_affiliations").required().exact(),
        FieldDef::belongs_to("category_type_id", "category_types").required().exact(),
        FieldDef::lookup("entry_time_type_id", "entry_time_types"),
        FieldDef::flag("off_gogglecup"),
        FieldDef::flag("fees_due").exact(),
        FieldDef::flag("badge_due"),
        FieldDef::flag("relays_due"),
    ],
    access: Access::crud("Badge"),
    ops: Ops::ALL,
    cascades: &[Cascade {
        table: "badge_payments",
        foreign_key: "badge_id",
    }],
    before_save: None,
};

pub static BADGE_PAYMENTS: ResourceDef = ResourceDef {
    table: "badge_payments",
    singular: "badge_payment",
    fields: &[
        FieldDef::belongs_to("badge_id", "badges").required().exact(),
        FieldDef::belongs_to("user_id", "users").exact(),
        FieldDef::date("payment_date").required().exact(),
        FieldDef::decimal("amount").required(),
        FieldDef::text("notes").like(),
        FieldDef::flag("manual"),
    ],
    access: Access::crud("BadgePayment"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static CATEGORY_TYPES: ResourceDef = ResourceDef {
    table: "category_types",
    singular: "category_type",
    fields: &[
        FieldDef::belongs_to("season_id", "seasons").required().exact(),
        FieldDef::text("code").required().exact(),
        FieldDef::text("description").like(),
        FieldDef::text("short_name"),
        FieldDef::text("group_name").exact(),
        FieldDef::int("age_begin"),
        FieldDef::int("age_end"),
        FieldDef::flag("relay").exact(),
        FieldDef::flag("out_of_race"),
        FieldDef::flag("undivided"),
    ],
    access: Access::crud("CategoryType"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};
