//! Application settings storage (grouped key/value pairs).

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::RepositoryResult;

/// Settings group holding runtime switches such as maintenance mode.
pub const APP_GROUP: &str = "app";
/// Key of the maintenance flag inside [`APP_GROUP`].
pub const MAINTENANCE_KEY: &str = "maintenance";

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// All key/value pairs of one group (empty when the group is unknown).
    async fn settings_for(&self, group: &str) -> RepositoryResult<Map<String, Value>>;

    /// Every group with its key/value pairs.
    async fn all_settings(&self) -> RepositoryResult<Map<String, Value>>;

    /// Insert or replace one setting.
    async fn put_setting(&self, group: &str, key: &str, value: Value) -> RepositoryResult<()>;

    /// Read a single setting.
    async fn setting(&self, group: &str, key: &str) -> RepositoryResult<Option<Value>> {
        Ok(self.settings_for(group).await?.remove(key))
    }

    /// Whether the API is in maintenance mode.
    async fn maintenance(&self) -> RepositoryResult<bool> {
        Ok(self
            .setting(APP_GROUP, MAINTENANCE_KEY)
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}
