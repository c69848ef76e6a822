//! Entity repository trait: generic CRUD over named entity tables.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::filter::FilterSet;
use crate::db::models::{InsertedFamily, NewFamily, Page, PageRequest, PoolStats, Record};

/// Repository trait for entity rows.
///
/// Rows are addressed by `(entity, id)` where `entity` is the table name of a
/// registered resource (e.g. `"meetings"`). Attribute maps are stored as
/// given; validation happens before they reach the repository.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Check if the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch one row by ID, `None` when missing.
    async fn find(&self, entity: &str, id: i64) -> RepositoryResult<Option<Record>>;

    /// List rows matching `filter`, ordered by ID ascending.
    async fn list(
        &self,
        entity: &str,
        filter: &FilterSet,
        page: PageRequest,
    ) -> RepositoryResult<Page<Record>>;

    /// Count rows matching `filter`.
    async fn count(&self, entity: &str, filter: &FilterSet) -> RepositoryResult<u64>;

    /// Insert a new row, assigning `id`, `created_at` and `updated_at`.
    async fn insert(&self, entity: &str, attrs: Record) -> RepositoryResult<Record>;

    /// Merge `attrs` into an existing row.
    ///
    /// # Returns
    /// * `Ok(Some(row))` - the updated row
    /// * `Ok(None)` - no row with that ID
    async fn update(&self, entity: &str, id: i64, attrs: Record)
        -> RepositoryResult<Option<Record>>;

    /// Insert a parent row and its children as one atomic write.
    ///
    /// The uniqueness check runs inside the same write, so concurrent
    /// callers cannot both pass it. `Ok(None)` when a row matching
    /// `family.unique` already exists; nothing is stored then.
    async fn insert_family(&self, family: NewFamily) -> RepositoryResult<Option<InsertedFamily>>;

    /// Delete a row; `Ok(false)` when it did not exist.
    async fn delete(&self, entity: &str, id: i64) -> RepositoryResult<bool>;

    /// Delete every row matching `filter`, returning how many were removed.
    async fn delete_where(&self, entity: &str, filter: &FilterSet) -> RepositoryResult<u64>;

    /// Connection pool figures, for backends that pool connections.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }

    /// First row (lowest ID) matching `filter`.
    async fn find_by(&self, entity: &str, filter: &FilterSet) -> RepositoryResult<Option<Record>> {
        let page = self.list(entity, filter, PageRequest::new(1, 1)).await?;
        Ok(page.items.into_iter().next())
    }

    /// Whether a row exists.
    async fn exists(&self, entity: &str, id: i64) -> RepositoryResult<bool> {
        Ok(self.find(entity, id).await?.is_some())
    }
}
