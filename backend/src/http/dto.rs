//! Response bodies of the non-CRUD endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::models::PoolStats;

/// `201` body of a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub msg: String,
    pub new: Value,
}

impl CreatedResponse {
    pub fn new(record: Value) -> Self {
        Self {
            msg: "OK".to_string(),
            new: record,
        }
    }
}

/// `201` body of a successful session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub msg: String,
    pub jwt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub msg: String,
    pub maintenance: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    /// Present for pooled backends only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}
