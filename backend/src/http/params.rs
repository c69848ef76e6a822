//! Request parameter helpers.
//!
//! Write endpoints accept parameters both in the query string and in a JSON
//! object body; body values win on conflicts.

use axum::body::Bytes;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::error::AppError;
use crate::models::validation::{coerce, ParamError};
use crate::models::FieldKind;

pub type Params = Map<String, Value>;

pub fn merge_params(query: HashMap<String, String>, body: &Bytes) -> Result<Params, AppError> {
    let mut params: Params = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(params);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => params.extend(fields),
        Ok(_) => return Err(AppError::BadRequest("request body must be a JSON object".into())),
        Err(e) => return Err(AppError::BadRequest(format!("invalid JSON body: {}", e))),
    }
    Ok(params)
}

/// Read a parameter as an integer.
pub fn int_param(params: &Params, name: &str) -> Result<Option<i64>, AppError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => coerce(FieldKind::Integer, value)
            .and_then(|v| v.as_i64())
            .map(Some)
            .ok_or_else(|| {
                ParamError {
                    field: name.to_string(),
                    expected: "integer",
                }
                .into()
            }),
    }
}

pub fn required_int(params: &Params, name: &str) -> Result<i64, AppError> {
    int_param(params, name)?.ok_or_else(|| AppError::BadRequest(format!("{} is missing", name)))
}

/// Read a parameter as text; numbers are rendered as text.
pub fn str_param(params: &Params, name: &str) -> Option<String> {
    match params.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

pub fn required_str(params: &Params, name: &str) -> Result<String, AppError> {
    str_param(params, name)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is missing", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_body_overrides_query() {
        let body = Bytes::from_static(br#"{"e": "body@example.org", "n": 3}"#);
        let params = merge_params(query(&[("e", "query@example.org"), ("t", "x")]), &body).unwrap();
        assert_eq!(params["e"], json!("body@example.org"));
        assert_eq!(params["t"], json!("x"));
        assert_eq!(required_int(&params, "n").unwrap(), 3);
    }

    #[test]
    fn test_empty_and_invalid_bodies() {
        assert!(merge_params(HashMap::new(), &Bytes::from_static(b"  ")).unwrap().is_empty());
        assert!(merge_params(HashMap::new(), &Bytes::from_static(b"[1]")).is_err());
        assert!(merge_params(HashMap::new(), &Bytes::from_static(b"{oops")).is_err());
    }

    #[test]
    fn test_int_params() {
        let params = merge_params(query(&[("a", "12"), ("b", "x"), ("c", "")]), &Bytes::new()).unwrap();
        assert_eq!(int_param(&params, "a").unwrap(), Some(12));
        assert!(int_param(&params, "b").is_err());
        assert_eq!(int_param(&params, "c").unwrap(), None);
        assert!(required_int(&params, "missing").is_err());
    }
}
