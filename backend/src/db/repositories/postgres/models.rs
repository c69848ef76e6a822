use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{app_settings, entity_rows};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = entity_rows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EntityRow {
    pub id: i64,
    pub entity: String,
    pub attrs: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = entity_rows)]
pub struct NewEntityRow {
    pub entity: String,
    pub attrs: Value,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = app_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // updated_at is only written by the database
pub struct SettingRow {
    pub group_key: String,
    pub setting_key: String,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = app_settings)]
pub struct NewSettingRow {
    pub group_key: String,
    pub setting_key: String,
    pub value: Value,
}
