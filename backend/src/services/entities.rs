//! Generic CRUD over registered resources.
//!
//! Every resource endpoint funnels through these functions: request bodies
//! are reduced to declared fields, passed through the resource save hook,
//! validated, and only then handed to the repository.

use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

use crate::auth::{GrantChecker, User};
use crate::db::filter::{filtering_hash_for, filtering_like_for, FilterParams, FilterSet};
use crate::db::models::{record_id, Page, PageRequest, Record};
use crate::db::repository::{EntityRepository, FullRepository, RepositoryError, RepositoryResult};
use crate::models::lookup::lookup_entry;
use crate::models::resources::resource;
use crate::models::validation::{
    declared_params, validate_patch, validate_presence, ParamError, ValidationErrors,
};
use crate::models::{Reference, ResourceDef, SaveContext};

#[derive(Debug, Error)]
pub enum EntityError {
    /// A parameter could not be coerced to its declared kind.
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ValidationErrors> for EntityError {
    fn from(errors: ValidationErrors) -> Self {
        EntityError::Invalid(errors)
    }
}

/// Fetch one row with hidden fields removed and references expanded one
/// level (`meeting_id` adds a `meeting` object).
///
/// A referenced row is only expanded when `user` may read its resource;
/// otherwise just the raw `*_id` is returned.
pub async fn show(
    repo: &dyn FullRepository,
    def: &ResourceDef,
    id: i64,
    user: &User,
) -> RepositoryResult<Option<Record>> {
    let Some(row) = repo.find(def.table, id).await? else {
        return Ok(None);
    };
    let mut shown = def.present(&row);
    let checker = GrantChecker::new(repo, user);

    for field in def.fields.iter().filter(|f| !f.hidden) {
        let Some(ref_id) = row.get(field.name).and_then(Value::as_i64) else {
            continue;
        };
        let expanded = match field.reference {
            Reference::Entity(table) => {
                let Some(target_def) = resource(table) else {
                    continue;
                };
                if !checker.allows(target_def.access.read).await? {
                    continue;
                }
                repo.find(table, ref_id)
                    .await?
                    .map(|target| Value::Object(target_def.present(&target)))
            }
            Reference::Lookup(table) => lookup_entry(table, ref_id)
                .and_then(|entry| serde_json::to_value(entry).ok()),
            Reference::None => None,
        };
        if let Some(value) = expanded {
            shown.insert(field.association_name().to_string(), value);
        }
    }
    Ok(Some(shown))
}

/// Filtered, paginated listing ordered by id.
pub async fn list(
    repo: &dyn FullRepository,
    def: &ResourceDef,
    params: &FilterParams,
    page: PageRequest,
) -> RepositoryResult<Page<Record>> {
    let filter = list_filter(def, params);
    let mut page = repo.list(def.table, &filter, page).await?;
    page.items = page.items.iter().map(|row| def.present(row)).collect();
    Ok(page)
}

/// Exact conditions for the resource's exact keys plus LIKE conditions for
/// its LIKE keys.
pub fn list_filter(def: &ResourceDef, params: &FilterParams) -> FilterSet {
    filtering_hash_for(params, &def.exact_filter_keys())
        .merge(filtering_like_for(params, &def.like_filter_keys()))
}

pub async fn create(
    repo: &dyn FullRepository,
    def: &ResourceDef,
    body: &Map<String, Value>,
    current_user_id: i64,
) -> Result<Record, EntityError> {
    let mut attrs = declared_params(def, body)?;
    validate_presence(def, &attrs)?;
    if let Some(hook) = def.before_save {
        let ctx = SaveContext {
            current_user_id,
            existing: None,
        };
        hook(&mut attrs, &ctx)?;
    }
    validate_references(repo, def, &attrs).await?;

    let row = repo.insert(def.table, attrs).await?;
    tracing::info!(entity = def.table, id = ?record_id(&row), "created");
    Ok(def.present(&row))
}

/// `Ok(false)` when the row does not exist.
pub async fn update(
    repo: &dyn FullRepository,
    def: &ResourceDef,
    id: i64,
    body: &Map<String, Value>,
    current_user_id: i64,
) -> Result<bool, EntityError> {
    let mut attrs = declared_params(def, body)?;
    let Some(existing) = repo.find(def.table, id).await? else {
        return Ok(false);
    };
    validate_patch(def, &attrs)?;
    if let Some(hook) = def.before_save {
        let ctx = SaveContext {
            current_user_id,
            existing: Some(&existing),
        };
        hook(&mut attrs, &ctx)?;
    }
    validate_references(repo, def, &attrs).await?;

    let updated = repo.update(def.table, id, attrs).await?.is_some();
    tracing::info!(entity = def.table, id, updated, "updated");
    Ok(updated)
}

/// Delete a row together with its declared children, depth first.
///
/// Children are removed as whole sets per parent; only children that have
/// cascades of their own are listed first.
///
/// `Ok(false)` when the row does not exist.
pub async fn destroy(
    repo: &dyn FullRepository,
    def: &'static ResourceDef,
    id: i64,
) -> RepositoryResult<bool> {
    if !repo.exists(def.table, id).await? {
        return Ok(false);
    }

    let mut pending = vec![(def, id)];
    let mut parents = Vec::new();
    let mut seen = HashSet::new();
    while let Some((def, id)) = pending.pop() {
        if !seen.insert((def.table, id)) {
            continue;
        }
        for cascade in def.cascades {
            let Some(child) = resource(cascade.table) else {
                continue;
            };
            if child.cascades.is_empty() {
                continue;
            }
            let filter = FilterSet::new().exact(cascade.foreign_key, Value::from(id));
            let rows = repo.list(child.table, &filter, PageRequest::all()).await?;
            pending.extend(rows.items.iter().filter_map(record_id).map(|child_id| (child, child_id)));
        }
        parents.push((def, id));
    }

    let mut removed = 0;
    for (parent, parent_id) in parents.into_iter().rev() {
        for cascade in parent.cascades {
            let filter = FilterSet::new().exact(cascade.foreign_key, Value::from(parent_id));
            removed += repo.delete_where(cascade.table, &filter).await?;
        }
    }
    let deleted = repo.delete(def.table, id).await?;
    tracing::info!(entity = def.table, id, children = removed, "deleted");
    Ok(deleted)
}

/// Referenced rows must exist and lookup ids must be known.
async fn validate_references(
    repo: &dyn FullRepository,
    def: &ResourceDef,
    attrs: &Record,
) -> Result<(), EntityError> {
    let mut errors = ValidationErrors::new();
    for field in def.fields {
        let Some(ref_id) = attrs.get(field.name).and_then(Value::as_i64) else {
            continue;
        };
        match field.reference {
            Reference::Entity(table) => {
                if !repo.exists(table, ref_id).await? {
                    errors.add(field.name, "must exist");
                }
            }
            Reference::Lookup(table) => {
                if lookup_entry(table, ref_id).is_none() {
                    errors.add(field.name, "is not included in the list");
                }
            }
            Reference::None => {}
        }
    }
    Ok(errors.into_result()?)
}
