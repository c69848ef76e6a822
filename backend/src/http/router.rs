//! Router configuration for the HTTP API.
//!
//! Every registered resource gets its own sub-router (singular member and
//! create paths, plural list path) carrying its definition as an
//! `Extension`; the sub-routers are merged under `/api/v3` next to the
//! dedicated endpoints.

use axum::{
    routing::{get, post, MethodRouter},
    Extension, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::state::AppState;
use super::{handlers, lookup, reservations, session, settings, tools};
use crate::models::{ResourceDef, RESOURCES};

/// Routes of one resource, honoring its enabled operations.
fn resource_router(def: &'static ResourceDef) -> Router<AppState> {
    let mut router = Router::new();

    let mut member: MethodRouter<AppState> = MethodRouter::new();
    if def.ops.show {
        member = member.get(handlers::show);
    }
    if def.ops.update {
        member = member.put(handlers::update);
    }
    if def.ops.delete {
        member = member.delete(handlers::destroy);
    }
    router = router.route(&format!("/{}/{{id}}", def.singular), member);

    if def.ops.create {
        router = router.route(&format!("/{}", def.singular), post(handlers::create));
    }
    if def.ops.list {
        router = router.route(&format!("/{}", def.plural()), get(handlers::list));
    }
    router.layer(Extension(def))
}

/// The `/api/v3` routes.
pub fn api_router() -> Router<AppState> {
    let special = Router::new()
        .route("/status", get(handlers::status))
        .route("/session", post(session::create_session))
        .route(
            "/meeting_reservation",
            post(reservations::create_meeting_reservation),
        )
        .route("/tools/find_entry_time", get(tools::find_entry_time))
        .route("/lookup/{entity_name}", get(lookup::lookup_list))
        .route("/settings", get(settings::list_settings))
        .route(
            "/setting/{group}",
            get(settings::show_setting).put(settings::update_setting),
        );

    RESOURCES
        .iter()
        .fold(special, |api, def| api.merge(resource_router(def)))
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v3", api_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let state = AppState::new(repo, ApiConfig::new("secret", "static"));
        let _router = create_router(state);
    }
}
