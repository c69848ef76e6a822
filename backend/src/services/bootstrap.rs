//! First-run admin account.

use serde_json::{json, Value};

use super::entities::{self, EntityError};
use crate::config::AdminBootstrap;
use crate::db::filter::FilterSet;
use crate::db::models::record_id;
use crate::db::repository::{EntityRepository, FullRepository};
use crate::models::resources::{ADMIN_GRANTS, USERS};

/// Create an admin user when the user table is empty.
///
/// Returns the new user id, or `None` when users already exist.
pub async fn ensure_admin(
    repo: &dyn FullRepository,
    admin: &AdminBootstrap,
) -> Result<Option<i64>, EntityError> {
    if repo.count(USERS.table, &FilterSet::new()).await? > 0 {
        return Ok(None);
    }

    let body = json!({
        "name": "admin",
        "email": admin.email,
        "password": admin.password,
        "active": true,
    });
    let Value::Object(body) = body else {
        return Ok(None);
    };
    let user = entities::create(repo, &USERS, &body, 0).await?;
    let Some(user_id) = record_id(&user) else {
        return Ok(None);
    };

    let grant = json!({ "user_id": user_id, "entity": null });
    if let Value::Object(grant) = grant {
        entities::create(repo, &ADMIN_GRANTS, &grant, user_id).await?;
    }
    tracing::info!(user_id, email = %admin.email, "bootstrap admin created");
    Ok(Some(user_id))
}
