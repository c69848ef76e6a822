//! API configuration loaded from environment variables.

use std::env;
use thiserror::Error;

use crate::auth::jwt::DEFAULT_TOKEN_LIFETIME_SEC;
use crate::db::repo_config::ApiSettings;

pub const DEFAULT_PER_PAGE: u64 = 25;
pub const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Credentials of the admin account created at startup when no user exists.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HS256 secret for session tokens.
    pub jwt_secret: String,
    /// HS256 key the static client token `t` is signed with.
    pub static_key: String,
    pub token_lifetime_sec: u64,
    pub default_per_page: u64,
    pub max_per_page: u64,
    pub admin: Option<AdminBootstrap>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            static_key: String::new(),
            token_lifetime_sec: DEFAULT_TOKEN_LIFETIME_SEC,
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
            admin: None,
        }
    }
}

impl ApiConfig {
    /// Configuration with explicit secrets and default tuning.
    pub fn new(jwt_secret: impl Into<String>, static_key: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            static_key: static_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `API_JWT_SECRET` (required): session token secret
    /// - `API_STATIC_KEY` (required): static client token key
    /// - `JWT_TOKEN_LIFETIME_SEC` (default: 36000)
    /// - `API_DEFAULT_PER_PAGE` (default: 25)
    /// - `API_MAX_PER_PAGE` (default: 100)
    /// - `GOGGLES_ADMIN_EMAIL` / `GOGGLES_ADMIN_PASSWORD` (optional, both or neither)
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = required("API_JWT_SECRET")?;
        let static_key = required("API_STATIC_KEY")?;

        let admin = match (
            optional("GOGGLES_ADMIN_EMAIL"),
            optional("GOGGLES_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };

        let config = Self {
            jwt_secret,
            static_key,
            token_lifetime_sec: number("JWT_TOKEN_LIFETIME_SEC", DEFAULT_TOKEN_LIFETIME_SEC)?,
            default_per_page: number("API_DEFAULT_PER_PAGE", DEFAULT_PER_PAGE)?,
            max_per_page: number("API_MAX_PER_PAGE", MAX_PER_PAGE)?,
            admin,
        };
        Ok(config.normalized())
    }

    /// Apply the optional `[api]` section of `repository.toml`.
    pub fn with_settings(mut self, settings: &ApiSettings) -> Self {
        if let Some(value) = settings.default_per_page {
            self.default_per_page = value;
        }
        if let Some(value) = settings.max_per_page {
            self.max_per_page = value;
        }
        if let Some(value) = settings.token_lifetime_sec {
            self.token_lifetime_sec = value;
        }
        self.normalized()
    }

    /// Keep `1 <= default_per_page <= max_per_page`.
    fn normalized(mut self) -> Self {
        self.max_per_page = self.max_per_page.max(1);
        self.default_per_page = self.default_per_page.clamp(1, self.max_per_page);
        self
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn number(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected: "a positive integer",
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::new("a", "b");
        assert_eq!(config.default_per_page, 25);
        assert_eq!(config.max_per_page, 100);
        assert_eq!(config.token_lifetime_sec, 36_000);
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_settings_override_and_clamp() {
        let settings = ApiSettings {
            default_per_page: Some(500),
            max_per_page: Some(50),
            token_lifetime_sec: Some(60),
        };
        let config = ApiConfig::new("a", "b").with_settings(&settings);
        assert_eq!(config.max_per_page, 50);
        assert_eq!(config.default_per_page, 50);
        assert_eq!(config.token_lifetime_sec, 60);
    }

    #[test]
    fn test_zero_values_are_lifted() {
        let settings = ApiSettings {
            default_per_page: Some(0),
            max_per_page: Some(0),
            token_lifetime_sec: None,
        };
        let config = ApiConfig::new("a", "b").with_settings(&settings);
        assert_eq!(config.max_per_page, 1);
        assert_eq!(config.default_per_page, 1);
    }
}
