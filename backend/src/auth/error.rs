//! Authentication and authorization failures.

use thiserror::Error;

use crate::db::repository::RepositoryError;

/// Why a request was not authenticated or not authorized.
///
/// Caller-side variants (see [`AuthError::is_unauthorized`]) map to `401`
/// and the [`AuthError::detail`] string is sent back in `X-Error-Detail`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization bearer token")]
    MissingToken,

    #[error("invalid session token: {0}")]
    InvalidToken(String),

    #[error("invalid static client token")]
    InvalidStaticToken,

    #[error("session user {0} not found or inactive")]
    UnknownUser(i64),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("API in maintenance mode")]
    Maintenance,

    #[error("insufficient grants")]
    InsufficientGrants,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Short machine-readable cause.
    pub fn detail(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing token",
            AuthError::InvalidToken(_) => "invalid token",
            AuthError::InvalidStaticToken => "invalid static token",
            AuthError::UnknownUser(_) => "unknown user",
            AuthError::InvalidCredentials => "invalid credentials",
            AuthError::Maintenance => "maintenance",
            AuthError::InsufficientGrants => "insufficient grants",
            AuthError::Hashing(_) | AuthError::Signing(_) => "internal error",
            AuthError::Repository(_) => "repository error",
        }
    }

    /// Whether the failure is the caller's fault (401) rather than ours.
    pub fn is_unauthorized(&self) -> bool {
        !matches!(
            self,
            AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Repository(_)
        )
    }
}
