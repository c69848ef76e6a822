//! Persistence layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (crate::services)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! │  EntityRepository + SettingsRepository = FullRepository │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     ▼                               ▼
//! ┌────────────────────┐   ┌──────────────────────────┐
//! │  LocalRepository   │   │  PostgresRepository      │
//! │  (in-memory)       │   │  (diesel, JSONB rows)    │
//! └────────────────────┘   └──────────────────────────┘
//! ```
//!
//! Entities are schemaless at this level: a row is a JSON object addressed
//! by `(entity, id)`. Field typing and validation live in `crate::models`.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod filter;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use checksum::{calculate_checksum, import_uid};
pub use factory::{RepositoryFactory, RepositoryType};
pub use filter::{filtering_hash_for, filtering_like_for, Condition, FilterParams, FilterSet};
pub use models::{InsertedFamily, NewFamily, Page, PageRequest, PoolStats, Record};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    EntityRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    SettingsRepository,
};
