#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use goggles_api::db::models::{record_id, Record};
use goggles_api::db::repositories::LocalRepository;
use goggles_api::db::repository::EntityRepository;
use goggles_api::models::resources::USERS;
use goggles_api::services::entities;
use serde_json::{json, Value};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub const JWT_SECRET: &str = "test-session-secret";
pub const STATIC_KEY: &str = "test-static-key";
pub const PASSWORD: &str = "password123";

pub fn record(value: Value) -> Record {
    value.as_object().cloned().expect("fixture must be a JSON object")
}

/// Insert a raw row, bypassing validation.
pub async fn insert(repo: &LocalRepository, table: &str, value: Value) -> i64 {
    let row = repo.insert(table, record(value)).await.expect("insert failed");
    record_id(&row).expect("inserted row has an id")
}

/// Create a user with [`PASSWORD`] and one admin grant per entry of `grants`
/// (`""` makes the user an admin).
pub async fn seed_user(repo: &LocalRepository, email: &str, grants: &[&str]) -> i64 {
    let user = entities::create(
        repo,
        &USERS,
        &record(json!({"name": email, "email": email, "password": PASSWORD})),
        0,
    )
    .await
    .expect("user creation failed");
    let user_id = record_id(&user).expect("user has an id");
    for entity in grants {
        let entity = if entity.is_empty() {
            Value::Null
        } else {
            Value::from(*entity)
        };
        insert(repo, "admin_grants", json!({"user_id": user_id, "entity": entity})).await;
    }
    user_id
}

#[cfg(feature = "http-server")]
pub use app::*;

#[cfg(feature = "http-server")]
mod app {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderMap, Method, Request, StatusCode};
    use axum::Router;
    use goggles_api::config::ApiConfig;
    use goggles_api::db::repositories::LocalRepository;
    use goggles_api::db::repository::FullRepository;
    use goggles_api::http::{create_router, AppState, X_ERROR_DETAIL};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{seed_user, JWT_SECRET, STATIC_KEY};

    /// Router over an in-memory repository with three seeded users.
    pub struct TestApp {
        pub repo: Arc<LocalRepository>,
        pub state: AppState,
        router: Router,
        pub admin_id: i64,
        /// Holds `City`, `Swimmer` and `Meeting` grants.
        pub editor_id: i64,
        /// No grants at all.
        pub reader_id: i64,
    }

    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Value,
    }

    impl TestResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|v| v.to_str().ok())
        }

        pub fn error_detail(&self) -> Option<&str> {
            self.headers.get(X_ERROR_DETAIL).and_then(|v| v.to_str().ok())
        }
    }

    impl TestApp {
        pub async fn new() -> Self {
            let repo = Arc::new(LocalRepository::new());
            let admin_id = seed_user(&repo, "admin@example.org", &[""]).await;
            let editor_id =
                seed_user(&repo, "editor@example.org", &["City", "Swimmer", "Meeting"]).await;
            let reader_id = seed_user(&repo, "reader@example.org", &[]).await;

            let state = AppState::new(
                repo.clone() as Arc<dyn FullRepository>,
                ApiConfig::new(JWT_SECRET, STATIC_KEY),
            );
            let router = create_router(state.clone());
            Self {
                repo,
                state,
                router,
                admin_id,
                editor_id,
                reader_id,
            }
        }

        pub fn token_for(&self, user_id: i64) -> String {
            self.state.jwt.encode(user_id).expect("token encoding failed")
        }

        pub fn static_token(&self) -> String {
            self.state.jwt.issue_static("tests").expect("static token failed")
        }

        pub async fn request(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> TestResponse {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("Authorization", format!("Bearer {}", token));
            }
            let body = match body {
                Some(value) => {
                    builder = builder.header("Content-Type", "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };
            let request = builder.body(body).expect("request build failed");

            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("router is infallible");
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body read failed");
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("response body is JSON")
            };
            TestResponse {
                status,
                headers,
                body,
            }
        }

        pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
            self.request(Method::GET, uri, token, None).await
        }

        pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
            self.request(Method::POST, uri, token, Some(body)).await
        }

        pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
            self.request(Method::PUT, uri, token, Some(body)).await
        }

        pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
            self.request(Method::DELETE, uri, token, None).await
        }
    }
}
