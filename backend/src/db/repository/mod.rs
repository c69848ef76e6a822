//! Repository traits for entity persistence.
//!
//! The HTTP layer only ever talks to [`FullRepository`]; concrete backends
//! live in `crate::db::repositories`.

pub mod entity;
pub mod error;
pub mod settings;

pub use entity::EntityRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use settings::SettingsRepository;

/// Everything a running API needs from its storage backend.
pub trait FullRepository: EntityRepository + SettingsRepository {}

impl<T> FullRepository for T where T: EntityRepository + SettingsRepository {}
