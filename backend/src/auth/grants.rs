//! Grant checks.
//!
//! A row in `admin_grants` with a blank `entity` makes its user an admin; a
//! row naming an entity (e.g. `"Meeting"`) gives CRUD rights on it. Team
//! managers are linked through `team_managers` rows.

use serde_json::Value;

use super::error::AuthError;
use super::User;
use crate::db::filter::FilterSet;
use crate::db::models::{record_str, PageRequest};
use crate::db::repository::{EntityRepository, FullRepository, RepositoryResult};
use crate::models::Permission;

pub struct GrantChecker<'a> {
    repo: &'a dyn FullRepository,
    user: &'a User,
}

impl<'a> GrantChecker<'a> {
    pub fn new(repo: &'a dyn FullRepository, user: &'a User) -> Self {
        Self { repo, user }
    }

    async fn grant_entities(&self) -> RepositoryResult<Vec<String>> {
        let filter = FilterSet::new().exact("user_id", Value::from(self.user.id));
        let page = self.repo.list("admin_grants", &filter, PageRequest::all()).await?;
        Ok(page
            .items
            .iter()
            .map(|row| record_str(row, "entity").unwrap_or_default().trim().to_string())
            .collect())
    }

    pub async fn admin(&self) -> RepositoryResult<bool> {
        Ok(self.grant_entities().await?.iter().any(String::is_empty))
    }

    /// Admins pass for every entity.
    pub async fn crud(&self, entity: &str) -> RepositoryResult<bool> {
        Ok(self
            .grant_entities()
            .await?
            .iter()
            .any(|granted| granted.is_empty() || granted == entity))
    }

    pub async fn team_manager(&self, team_affiliation_id: i64) -> RepositoryResult<bool> {
        let filter = FilterSet::new()
            .exact("team_affiliation_id", Value::from(team_affiliation_id))
            .exact("user_id", Value::from(self.user.id));
        Ok(self.repo.count("team_managers", &filter).await? > 0)
    }

    pub async fn allows(&self, permission: Permission) -> RepositoryResult<bool> {
        match permission {
            Permission::Session => Ok(true),
            Permission::Crud(entity) => self.crud(entity).await,
            Permission::Admin => self.admin().await,
        }
    }

    /// `Err(AuthError::InsufficientGrants)` unless `permission` holds.
    pub async fn require(&self, permission: Permission) -> Result<(), AuthError> {
        if self.allows(permission).await? {
            Ok(())
        } else {
            tracing::debug!(user_id = self.user.id, ?permission, "grant check failed");
            Err(AuthError::InsufficientGrants)
        }
    }
}
