use crate::models::resource::{Access, FieldDef, Ops, ResourceDef};

pub static CITIES: ResourceDef = ResourceDef {
    table: "cities",
    singular: "city",
    fields: &[
        FieldDef::text("name").required().like(),
        FieldDef::text("country_code").required().exact(),
        FieldDef::text("country").like(),
        FieldDef::text("area").like(),
        FieldDef::text("zip"),
        FieldDef::text("latitude"),
        FieldDef::text("longitude"),
    ],
    access: Access::crud("City"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static SWIMMING_POOLS: ResourceDef = ResourceDef {
    table: "swimming_pools",
    singular: "swimming_pool",
    fields: &[
        FieldDef::text("name").required().like(),
        FieldDef::text("nick_name").required().like(),
        FieldDef::text("address").like(),
        FieldDef::text("zip"),
        FieldDef::belongs_to("city_id", "cities").exact(),
        FieldDef::lookup("pool_type_id", "pool_types").required().exact(),
        FieldDef::int("lanes_number"),
        FieldDef::text("phone_number"),
        FieldDef::text("e_mail"),
        FieldDef::text("contact_name"),
        FieldDef::text("maps_uri"),
        FieldDef::flag("multiple_pools"),
        FieldDef::flag("garden"),
        FieldDef::flag("bar"),
        FieldDef::flag("read_only").exact(),
    ],
    access: Access::crud("SwimmingPool"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};
