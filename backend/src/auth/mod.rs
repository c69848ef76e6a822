//! Authentication: users, session tokens, passwords and grants.

pub mod error;
pub mod grants;
pub mod jwt;
pub mod password;

pub use error::AuthError;
pub use grants::GrantChecker;
pub use jwt::{Claims, JwtManager};

use serde::Serialize;
use serde_json::Value;

use crate::db::filter::FilterSet;
use crate::db::models::{record_flag, record_id, record_str, Record};
use crate::db::repository::{EntityRepository, FullRepository, RepositoryResult};

/// An API user as needed by authentication.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub active: bool,
    #[serde(skip)]
    pub encrypted_password: Option<String>,
}

impl User {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record_id(record)?,
            name: record_str(record, "name").unwrap_or_default().to_string(),
            email: record_str(record, "email").unwrap_or_default().to_string(),
            active: record_flag(record, "active"),
            encrypted_password: record_str(record, "encrypted_password").map(str::to_string),
        })
    }
}

/// Load an active user by id.
pub async fn load_user(repo: &dyn FullRepository, id: i64) -> RepositoryResult<Option<User>> {
    Ok(repo
        .find("users", id)
        .await?
        .as_ref()
        .and_then(User::from_record)
        .filter(|user| user.active))
}

/// Check e-mail and password, returning the active matching user.
pub async fn authenticate(
    repo: &dyn FullRepository,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }

    let filter = FilterSet::new().exact("email", Value::String(email));
    let user = repo
        .find_by("users", &filter)
        .await?
        .as_ref()
        .and_then(User::from_record)
        .filter(|user| user.active)
        .ok_or(AuthError::InvalidCredentials)?;

    let verified = user
        .encrypted_password
        .as_deref()
        .map(|hash| password::verify_password(password, hash))
        .unwrap_or(false);
    if !verified {
        tracing::info!(user_id = user.id, "rejected credentials");
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user)
}
