//! Postgres repository implementation using Diesel.
//!
//! Every entity is stored as a JSONB document in `entity_rows`, keyed by the
//! entity table name. Filters are translated into JSONB predicates so the
//! exact/LIKE semantics match the local repository.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::sql;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{Bool, Jsonb, Text};
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::filter::{Condition, FilterSet};
use crate::db::models::{
    InsertedFamily, NewFamily, Page, PageRequest, PoolStats, Record, SYSTEM_FIELDS,
};
use crate::db::repository::{
    EntityRepository, ErrorContext, RepositoryError, RepositoryResult, SettingsRepository,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;
type BoxedRows<'a> = entity_rows::BoxedQuery<'a, Pg>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Migration failed: {}", e),
                    ErrorContext::new("run_migrations"),
                )
            })?;
        }

        tracing::info!(max_pool_size = config.max_pool_size, "Postgres repository ready");

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run a blocking Diesel operation on the blocking pool, retrying
    /// retryable failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        tracing::warn!(attempt = attempt + 1, error = %e, "retrying query");
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// Rows of one entity narrowed by a filter set.
fn filtered<'a>(entity: &'a str, filter: &FilterSet) -> BoxedRows<'a> {
    filter.conditions().iter().fold(
        entity_rows::table
            .filter(entity_rows::entity.eq(entity))
            .into_boxed(),
        |query, condition| match condition {
            Condition::Exact { field, value } => query.filter(
                sql::<Bool>("(attrs -> ")
                    .bind::<Text, _>(field.clone())
                    .sql(") = ")
                    .bind::<Jsonb, _>(value.clone()),
            ),
            Condition::Like { field, pattern } => query.filter(
                sql::<Bool>("(attrs ->> ")
                    .bind::<Text, _>(field.clone())
                    .sql(") ILIKE ")
                    .bind::<Text, _>(pattern.clone()),
            ),
        },
    )
}

fn strip_system_fields(mut attrs: Record) -> Record {
    for field in SYSTEM_FIELDS {
        attrs.remove(field);
    }
    attrs
}

fn row_to_record(row: EntityRow) -> RepositoryResult<Record> {
    let Value::Object(mut record) = row.attrs else {
        return Err(RepositoryError::internal_with_context(
            "attrs column is not a JSON object",
            ErrorContext::new("decode_row")
                .with_entity(row.entity)
                .with_entity_id(row.id),
        ));
    };
    record.insert("id".to_string(), Value::from(row.id));
    record.insert(
        "created_at".to_string(),
        Value::String(row.created_at.to_rfc3339()),
    );
    record.insert(
        "updated_at".to_string(),
        Value::String(row.updated_at.to_rfc3339()),
    );
    Ok(record)
}

#[async_trait]
impl EntityRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        let state = self.pool.state();
        Some(PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        })
    }

    async fn find(&self, entity: &str, id: i64) -> RepositoryResult<Option<Record>> {
        let entity = entity.to_string();
        self.with_conn(move |conn| {
            entity_rows::table
                .filter(entity_rows::entity.eq(&entity))
                .filter(entity_rows::id.eq(id))
                .select(EntityRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_record)
                .transpose()
        })
        .await
    }

    async fn list(
        &self,
        entity: &str,
        filter: &FilterSet,
        page: PageRequest,
    ) -> RepositoryResult<Page<Record>> {
        let entity = entity.to_string();
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let total: i64 = filtered(&entity, &filter)
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;

            let rows: Vec<EntityRow> = filtered(&entity, &filter)
                .order(entity_rows::id.asc())
                .limit(page.per_page.min(i64::MAX as u64) as i64)
                .offset(page.offset().min(i64::MAX as u64) as i64)
                .select(EntityRow::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;

            let items = rows
                .into_iter()
                .map(row_to_record)
                .collect::<RepositoryResult<Vec<_>>>()?;

            Ok(Page {
                items,
                total: total as u64,
                page: page.page,
                per_page: page.per_page,
            })
        })
        .await
    }

    async fn count(&self, entity: &str, filter: &FilterSet) -> RepositoryResult<u64> {
        let entity = entity.to_string();
        let filter = filter.clone();
        self.with_conn(move |conn| {
            filtered(&entity, &filter)
                .count()
                .get_result::<i64>(conn)
                .map(|n| n as u64)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn insert(&self, entity: &str, attrs: Record) -> RepositoryResult<Record> {
        let new_row = NewEntityRow {
            entity: entity.to_string(),
            attrs: Value::Object(strip_system_fields(attrs)),
        };
        self.with_conn(move |conn| {
            let row = diesel::insert_into(entity_rows::table)
                .values(&new_row)
                .returning(EntityRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;
            row_to_record(row)
        })
        .await
        .map_err(|e| e.with_operation("insert").with_entity(entity))
    }

    async fn insert_family(&self, family: NewFamily) -> RepositoryResult<Option<InsertedFamily>> {
        let entity = family.entity.clone();
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                // Held until commit: one family write per parent entity at a time.
                sql_query("SELECT pg_advisory_xact_lock(hashtext($1))")
                    .bind::<Text, _>(family.entity.clone())
                    .execute(conn)?;

                let taken: i64 = filtered(&family.entity, &family.unique)
                    .count()
                    .get_result(conn)?;
                if taken > 0 {
                    return Ok(None);
                }

                let parent = diesel::insert_into(entity_rows::table)
                    .values(&NewEntityRow {
                        entity: family.entity.clone(),
                        attrs: Value::Object(strip_system_fields(family.attrs.clone())),
                    })
                    .returning(EntityRow::as_returning())
                    .get_result(conn)?;

                let new_children: Vec<NewEntityRow> = family
                    .children
                    .iter()
                    .cloned()
                    .map(|mut child| {
                        child.insert(family.foreign_key.clone(), Value::from(parent.id));
                        NewEntityRow {
                            entity: family.child_entity.clone(),
                            attrs: Value::Object(strip_system_fields(child)),
                        }
                    })
                    .collect();
                let children: Vec<EntityRow> = if new_children.is_empty() {
                    Vec::new()
                } else {
                    diesel::insert_into(entity_rows::table)
                        .values(&new_children)
                        .returning(EntityRow::as_returning())
                        .get_results(conn)?
                };

                Ok(Some(InsertedFamily {
                    parent: row_to_record(parent)?,
                    children: children
                        .into_iter()
                        .map(row_to_record)
                        .collect::<RepositoryResult<_>>()?,
                }))
            })
        })
        .await
        .map_err(|e| e.with_operation("insert_family").with_entity(entity))
    }

    async fn update(
        &self,
        entity: &str,
        id: i64,
        attrs: Record,
    ) -> RepositoryResult<Option<Record>> {
        let entity_name = entity.to_string();
        let patch = strip_system_fields(attrs);
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let current: Option<EntityRow> = entity_rows::table
                    .filter(entity_rows::entity.eq(&entity_name))
                    .filter(entity_rows::id.eq(id))
                    .select(EntityRow::as_select())
                    .for_update()
                    .first(conn)
                    .optional()?;

                let Some(current) = current else {
                    return Ok(None);
                };

                let mut merged = match current.attrs {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                merged.extend(patch.clone());

                let row = diesel::update(entity_rows::table.find(id))
                    .set((
                        entity_rows::attrs.eq(Value::Object(merged)),
                        entity_rows::updated_at.eq(Utc::now()),
                    ))
                    .returning(EntityRow::as_returning())
                    .get_result(conn)?;
                row_to_record(row).map(Some)
            })
        })
        .await
        .map_err(|e| e.with_operation("update").with_entity(entity))
    }

    async fn delete(&self, entity: &str, id: i64) -> RepositoryResult<bool> {
        let entity = entity.to_string();
        self.with_conn(move |conn| {
            diesel::delete(
                entity_rows::table
                    .filter(entity_rows::entity.eq(&entity))
                    .filter(entity_rows::id.eq(id)),
            )
            .execute(conn)
            .map(|n| n > 0)
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_where(&self, entity: &str, filter: &FilterSet) -> RepositoryResult<u64> {
        let entity = entity.to_string();
        let filter = filter.clone();
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let ids: Vec<i64> = filtered(&entity, &filter)
                    .select(entity_rows::id)
                    .load(conn)?;
                if ids.is_empty() {
                    return Ok(0);
                }
                let removed = diesel::delete(entity_rows::table.filter(entity_rows::id.eq_any(&ids)))
                    .execute(conn)?;
                Ok(removed as u64)
            })
        })
        .await
    }
}

#[async_trait]
impl SettingsRepository for PostgresRepository {
    async fn settings_for(&self, group: &str) -> RepositoryResult<Map<String, Value>> {
        let group = group.to_string();
        self.with_conn(move |conn| {
            let rows: Vec<SettingRow> = app_settings::table
                .filter(app_settings::group_key.eq(&group))
                .order(app_settings::setting_key.asc())
                .select(SettingRow::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;
            Ok(rows
                .into_iter()
                .map(|row| (row.setting_key, row.value))
                .collect())
        })
        .await
    }

    async fn all_settings(&self) -> RepositoryResult<Map<String, Value>> {
        self.with_conn(|conn| {
            let rows: Vec<SettingRow> = app_settings::table
                .order((app_settings::group_key.asc(), app_settings::setting_key.asc()))
                .select(SettingRow::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;

            let mut groups = Map::new();
            for row in rows {
                let group = groups
                    .entry(row.group_key)
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(values) = group {
                    values.insert(row.setting_key, row.value);
                }
            }
            Ok(groups)
        })
        .await
    }

    async fn put_setting(&self, group: &str, key: &str, value: Value) -> RepositoryResult<()> {
        let row = NewSettingRow {
            group_key: group.to_string(),
            setting_key: key.to_string(),
            value,
        };
        self.with_conn(move |conn| {
            diesel::insert_into(app_settings::table)
                .values(&row)
                .on_conflict((app_settings::group_key, app_settings::setting_key))
                .do_update()
                .set((
                    app_settings::value.eq(excluded(app_settings::value)),
                    app_settings::updated_at.eq(Utc::now()),
                ))
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }
}
