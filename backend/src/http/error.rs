//! HTTP error handling and response types.
//!
//! Every error is answered with a JSON [`ApiError`] body and an
//! `X-Error-Detail` header carrying a short cause (or, for validation
//! failures, the JSON error map).

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthError;
use crate::db::repository::RepositoryError;
use crate::models::validation::{ParamError, ValidationErrors};
use crate::services::{EntityError, ReservationError};

pub const X_ERROR_DETAIL: HeaderName = HeaderName::from_static("x-error-detail");

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Malformed or mistyped request parameters.
    BadRequest(String),
    /// Authentication/authorization failure with its `X-Error-Detail` cause.
    Unauthorized { detail: &'static str, message: String },
    /// Entity validation failure.
    Unprocessable(ValidationErrors),
    Internal(String),
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Header values must be visible ASCII; anything else becomes `?`.
fn header_value(text: &str) -> Option<HeaderValue> {
    let sanitized: String = text
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect();
    HeaderValue::from_str(&sanitized).ok()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (detail, error) = match self {
            AppError::NotFound(msg) => (msg.clone(), ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => (msg.clone(), ApiError::new("BAD_REQUEST", msg)),
            AppError::Unauthorized { detail, message } => {
                (detail.to_string(), ApiError::new("UNAUTHORIZED", message))
            }
            AppError::Unprocessable(errors) => {
                let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
                (
                    errors.to_json(),
                    ApiError::new("UNPROCESSABLE_ENTITY", errors.to_string()).with_details(details),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (msg.clone(), ApiError::new("INTERNAL_ERROR", msg))
            }
            AppError::Repository(e) => {
                let msg = e.to_string();
                if e.is_not_found() {
                    (msg.clone(), ApiError::new("NOT_FOUND", msg))
                } else {
                    tracing::error!(error = %msg, "repository error");
                    (msg.clone(), ApiError::new("REPOSITORY_ERROR", msg))
                }
            }
        };

        let mut response = (status, Json(error)).into_response();
        if let Some(value) = header_value(&detail) {
            response.headers_mut().insert(X_ERROR_DETAIL, value);
        }
        response
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Repository(e) => AppError::Repository(e),
            e if e.is_unauthorized() => AppError::Unauthorized {
                detail: e.detail(),
                message: e.to_string(),
            },
            e => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ParamError> for AppError {
    fn from(err: ParamError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Unprocessable(errors)
    }
}

impl From<EntityError> for AppError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::Param(e) => e.into(),
            EntityError::Invalid(errors) => AppError::Unprocessable(errors),
            EntityError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Auth(e) => e.into(),
            ReservationError::Invalid(errors) => AppError::Unprocessable(errors),
            ReservationError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
