//! Users, grants and the import queue.

use serde_json::Value;

use crate::auth::password::hash_password;
use crate::db::checksum::import_uid;
use crate::db::models::{record_i64, record_str, Record};
use crate::models::resource::{Access, Cascade, FieldDef, Ops, ResourceDef, SaveContext};
use crate::models::validation::ValidationErrors;

pub static USERS: ResourceDef = ResourceDef {
    table: "users",
    singular: "user",
    fields: &[
        FieldDef::text("name").required().like(),
        FieldDef::text("email").required().like(),
        FieldDef::text("description").like(),
        FieldDef::text("first_name").like(),
        FieldDef::text("last_name").like(),
        FieldDef::int("year_of_birth"),
        FieldDef::belongs_to("swimmer_id", "swimmers").exact(),
        FieldDef::flag("active").exact(),
        // Plain text is consumed by the save hook and never stored.
        FieldDef::text("password").hidden(),
        FieldDef::text("encrypted_password").hidden().derived(),
    ],
    access: Access::admin(),
    ops: Ops::ALL,
    cascades: &[
        Cascade {
            table: "admin_grants",
            foreign_key: "user_id",
        },
        Cascade {
            table: "team_managers",
            foreign_key: "user_id",
        },
    ],
    before_save: Some(user_credentials),
};

fn user_credentials(attrs: &mut Record, ctx: &SaveContext<'_>) -> Result<(), ValidationErrors> {
    if let Some(email) = record_str(attrs, "email") {
        let email = email.trim().to_lowercase();
        if !email.is_empty() && !email.contains('@') {
            return Err(ValidationErrors::single("email", "is invalid"));
        }
        attrs.insert("email".to_string(), Value::String(email));
    }

    match attrs.remove("password") {
        Some(Value::String(plain)) if !plain.is_empty() => {
            if plain.chars().count() < 8 {
                return Err(ValidationErrors::single(
                    "password",
                    "is too short (minimum is 8 characters)",
                ));
            }
            let hash = hash_password(&plain)
                .map_err(|_| ValidationErrors::single("password", "could not be stored"))?;
            attrs.insert("encrypted_password".to_string(), Value::String(hash));
        }
        _ if ctx.is_create() => {
            return Err(ValidationErrors::single("password", "can't be blank"));
        }
        _ => {}
    }

    if ctx.is_create() && !attrs.contains_key("active") {
        attrs.insert("active".to_string(), Value::Bool(true));
    }
    Ok(())
}

/// A grant with a blank `entity` makes the user an admin.
pub static ADMIN_GRANTS: ResourceDef = ResourceDef {
    table: "admin_grants",
    singular: "admin_grant",
    fields: &[
        FieldDef::belongs_to("user_id", "users").required().exact(),
        FieldDef::text("entity").exact(),
    ],
    access: Access::admin(),
    ops: Ops::ALL,
    cascades: &[],
    before_save: None,
};

pub static IMPORT_QUEUES: ResourceDef = ResourceDef {
    table: "import_queues",
    singular: "import_queue",
    fields: &[
        FieldDef::belongs_to("user_id", "users").exact(),
        FieldDef::text("request_data").required(),
        FieldDef::text("uid").exact().derived(),
        FieldDef::text("solved_data"),
        FieldDef::int("process_runs"),
        FieldDef::flag("done").exact(),
    ],
    access: Access::crud("ImportQueue"),
    ops: Ops::ALL,
    cascades: &[],
    before_save: Some(import_queue_defaults),
};

fn import_queue_defaults(attrs: &mut Record, ctx: &SaveContext<'_>) -> Result<(), ValidationErrors> {
    if !ctx.is_create() {
        return Ok(());
    }
    let user_id = record_i64(attrs, "user_id").unwrap_or(ctx.current_user_id);
    attrs.insert("user_id".to_string(), Value::from(user_id));
    if let Some(request) = record_str(attrs, "request_data") {
        let uid = import_uid(user_id, request);
        attrs.insert("uid".to_string(), Value::String(uid));
    }
    attrs.entry("process_runs").or_insert(Value::from(0));
    attrs.entry("done").or_insert(Value::Bool(false));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use serde_json::json;

    fn attrs(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    const CREATE: SaveContext<'static> = SaveContext {
        current_user_id: 7,
        existing: None,
    };

    #[test]
    fn test_user_password_is_hashed() {
        let mut row = attrs(json!({"name": "steve", "email": "Steve@Example.org", "password": "password123"}));
        user_credentials(&mut row, &CREATE).unwrap();

        assert!(!row.contains_key("password"));
        assert_eq!(row["email"], json!("steve@example.org"));
        assert_eq!(row["active"], json!(true));
        let hash = row["encrypted_password"].as_str().unwrap();
        assert!(verify_password("password123", hash));
    }

    #[test]
    fn test_user_password_rules() {
        let mut missing = attrs(json!({"name": "a", "email": "a@b.c"}));
        let errors = user_credentials(&mut missing, &CREATE).unwrap_err();
        assert_eq!(errors.messages_for("password"), ["can't be blank"]);

        let mut short = attrs(json!({"email": "a@b.c", "password": "short"}));
        assert!(user_credentials(&mut short, &CREATE).is_err());

        let stored = attrs(json!({"email": "a@b.c"}));
        let update = SaveContext { current_user_id: 7, existing: Some(&stored) };
        let mut patch = attrs(json!({"description": "x"}));
        assert!(user_credentials(&mut patch, &update).is_ok());
        assert!(!patch.contains_key("encrypted_password"));
    }

    #[test]
    fn test_import_queue_defaults() {
        let mut row = attrs(json!({"request_data": "{\"target_entity\":\"Swimmer\"}"}));
        import_queue_defaults(&mut row, &CREATE).unwrap();
        assert_eq!(row["user_id"], json!(7));
        assert_eq!(row["process_runs"], json!(0));
        assert_eq!(
            row["uid"],
            json!(import_uid(7, "{\"target_entity\":\"Swimmer\"}"))
        );
    }
}
