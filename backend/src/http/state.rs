//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, &config.static_key, config.token_lifetime_sec);
        Self {
            repository,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }
}
