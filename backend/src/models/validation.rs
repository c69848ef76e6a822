//! Parameter coercion and attribute validation.
//!
//! Two failure families exist:
//! - [`ParamError`]: a request value cannot be coerced to the declared kind
//!   (answered with 400);
//! - [`ValidationErrors`]: the coerced attributes do not form a valid entity
//!   (answered with 422 and a per-field error map).

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::resource::{FieldDef, FieldKind, ResourceDef};
use crate::db::filter::FilterParams;
use crate::db::models::Record;

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages_for(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Compact JSON rendering, used for the `X-Error-Detail` header.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{} {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A request parameter with the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} is invalid: expected {expected}")]
pub struct ParamError {
    pub field: String,
    pub expected: &'static str,
}

/// Coerce a JSON value to a field kind.
///
/// Strings holding numbers/booleans are accepted, as form and query values
/// always arrive as text. `null` passes through unchanged.
pub fn coerce(kind: FieldKind, value: &Value) -> Option<Value> {
    match (kind, value) {
        (_, Value::Null) => Some(Value::Null),
        (kind, Value::String(s)) if kind != FieldKind::Text && s.trim().is_empty() => {
            Some(Value::Null)
        }

        (FieldKind::Integer, Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
                    .map(|f| f as i64)
            })
            .map(Value::from),
        (FieldKind::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),

        (FieldKind::Decimal, Value::Number(n)) => n.as_f64().and_then(decimal),
        (FieldKind::Decimal, Value::String(s)) => s.trim().parse::<f64>().ok().and_then(decimal),

        (FieldKind::Text, Value::String(s)) => Some(Value::String(s.clone())),
        (FieldKind::Text, Value::Number(n)) => Some(Value::String(n.to_string())),
        (FieldKind::Text, Value::Bool(b)) => Some(Value::String(b.to_string())),

        (FieldKind::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
        (FieldKind::Boolean, Value::Number(n)) => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        (FieldKind::Boolean, Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "f" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },

        (FieldKind::Date, Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),

        _ => None,
    }
}

fn decimal(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}

fn coerce_field(field: &FieldDef, value: &Value) -> Result<Value, ParamError> {
    coerce(field.kind, value).ok_or_else(|| ParamError {
        field: field.name.to_string(),
        expected: field.kind.name(),
    })
}

/// Keep only the writable declared fields of a request body, coerced.
///
/// Undeclared keys, system attributes and derived fields are dropped
/// silently.
pub fn declared_params(def: &ResourceDef, body: &Map<String, Value>) -> Result<Record, ParamError> {
    let mut attrs = Record::new();
    for field in def.fields.iter().filter(|f| !f.derived) {
        if let Some(value) = body.get(field.name) {
            attrs.insert(field.name.to_string(), coerce_field(field, value)?);
        }
    }
    Ok(attrs)
}

/// Coerce the filterable query parameters of a list request.
pub fn filter_params(
    def: &ResourceDef,
    query: &HashMap<String, String>,
) -> Result<FilterParams, ParamError> {
    let mut params = FilterParams::new();
    for field in def.fields.iter().filter(|f| f.filter != super::resource::FilterKind::None) {
        if let Some(raw) = query.get(field.name).filter(|raw| !raw.trim().is_empty()) {
            let raw = Value::String(raw.clone());
            let value = match field.filter {
                // LIKE terms are matched as text whatever the kind.
                super::resource::FilterKind::Like => raw,
                _ => coerce_field(field, &raw)?,
            };
            params.insert(field.name.to_string(), value);
        }
    }
    Ok(params)
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Presence checks for a row about to be created.
pub fn validate_presence(def: &ResourceDef, attrs: &Record) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in def.fields.iter().filter(|f| f.required) {
        if is_blank(attrs.get(field.name)) {
            errors.add(field.name, "can't be blank");
        }
    }
    errors.into_result()
}

/// Presence checks for a partial update: required fields may be omitted but
/// not cleared.
pub fn validate_patch(def: &ResourceDef, patch: &Record) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in def.fields.iter().filter(|f| f.required) {
        if patch.contains_key(field.name) && is_blank(patch.get(field.name)) {
            errors.add(field.name, "can't be blank");
        }
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resource::{Access, Ops};
    use serde_json::json;

    static FIELDS: &[FieldDef] = &[
        FieldDef::text("description").required().like(),
        FieldDef::date("header_date").required().exact(),
        FieldDef::belongs_to("season_id", "seasons").required().exact(),
        FieldDef::flag("cancelled").exact(),
        FieldDef::decimal("fee"),
        FieldDef::text("complete_name").derived(),
    ];

    static MEETINGS: ResourceDef = ResourceDef {
        table: "meetings",
        singular: "meeting",
        fields: FIELDS,
        access: Access::crud("Meeting"),
        ops: Ops::ALL,
        cascades: &[],
        before_save: None,
    };

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_coerce_accepts_textual_values() {
        assert_eq!(coerce(FieldKind::Integer, &json!("42")), Some(json!(42)));
        assert_eq!(coerce(FieldKind::Integer, &json!(3.0)), Some(json!(3)));
        assert_eq!(coerce(FieldKind::Integer, &json!(3.5)), None);
        assert_eq!(coerce(FieldKind::Integer, &json!(1e30)), None);
        assert_eq!(coerce(FieldKind::Integer, &json!(-1e30)), None);
        assert_eq!(coerce(FieldKind::Integer, &json!(-4096.0)), Some(json!(-4096)));
        assert_eq!(coerce(FieldKind::Decimal, &json!("12.5")), Some(json!(12.5)));
        assert_eq!(coerce(FieldKind::Boolean, &json!("true")), Some(json!(true)));
        assert_eq!(coerce(FieldKind::Boolean, &json!(0)), Some(json!(false)));
        assert_eq!(coerce(FieldKind::Boolean, &json!("maybe")), None);
        assert_eq!(coerce(FieldKind::Text, &json!(7)), Some(json!("7")));
        assert_eq!(coerce(FieldKind::Date, &json!("2023-11-05")), Some(json!("2023-11-05")));
        assert_eq!(coerce(FieldKind::Date, &json!("2023-02-30")), None);
        assert_eq!(coerce(FieldKind::Date, &json!(null)), Some(json!(null)));
        assert_eq!(coerce(FieldKind::Integer, &json!(" ")), Some(json!(null)));
        assert_eq!(coerce(FieldKind::Text, &json!("")), Some(json!("")));
    }

    #[test]
    fn test_declared_params_drops_unknown_and_derived() {
        let attrs = declared_params(
            &MEETINGS,
            &body(json!({
                "description": "Trofeo",
                "season_id": "182",
                "complete_name": "ignored",
                "id": 99,
                "bogus": true
            })),
        )
        .unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["season_id"], json!(182));
    }

    #[test]
    fn test_declared_params_reports_bad_type() {
        let err = declared_params(&MEETINGS, &body(json!({"season_id": "abc"}))).unwrap_err();
        assert_eq!(err.field, "season_id");
        assert_eq!(err.expected, "integer");

        let err = declared_params(&MEETINGS, &body(json!({"season_id": 1e30}))).unwrap_err();
        assert_eq!(err.field, "season_id");
    }

    #[test]
    fn test_filter_params_coerces_exact_but_not_like() {
        let query: HashMap<String, String> = [
            ("season_id".to_string(), "7".to_string()),
            ("description".to_string(), "42".to_string()),
            ("fee".to_string(), "3".to_string()),
        ]
        .into_iter()
        .collect();
        let params = filter_params(&MEETINGS, &query).unwrap();
        assert_eq!(params["season_id"], json!(7));
        assert_eq!(params["description"], json!("42"));
        assert!(!params.contains_key("fee"));
    }

    #[test]
    fn test_validate_presence_collects_all_missing_fields() {
        let attrs = body(json!({"description": "  ", "season_id": 1}));
        let errors = validate_presence(&MEETINGS, &attrs).unwrap_err();
        assert_eq!(errors.messages_for("description"), ["can't be blank"]);
        assert_eq!(errors.messages_for("header_date"), ["can't be blank"]);
        assert!(errors.messages_for("season_id").is_empty());
        assert_eq!(
            errors.to_json(),
            r#"{"description":["can't be blank"],"header_date":["can't be blank"]}"#
        );
    }

    #[test]
    fn test_validate_patch_only_checks_present_keys() {
        assert!(validate_patch(&MEETINGS, &body(json!({"cancelled": true}))).is_ok());
        let errors = validate_patch(&MEETINGS, &body(json!({"description": null}))).unwrap_err();
        assert_eq!(errors.to_string(), "description can't be blank");
    }
}
