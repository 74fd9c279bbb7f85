//! API error types with IntoResponse
//!
//! Every error becomes `{"success": false, "error": "<message>"}` with a
//! matching status code. Server-side failures are logged and answered with a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portfolio_core::ValidationError;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::repos::DbError;
use crate::db::{ConnectError, StoreError};

pub const DUPLICATE_MESSAGE: &str = "A record with this value already exists";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Field validation failed (400)
    Validation(ValidationError),

    /// Malformed request or rejected input (400)
    BadRequest(String),

    /// Missing or invalid credentials (401)
    Unauthorized(String),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Store operation failed (500, logged)
    Database(DbError),

    /// No database reachable (500, logged)
    Unavailable(ConnectError),

    /// Request exceeded the configured time budget (500, logged)
    Timeout { seconds: u64 },

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        Self::Unauthorized("Authentication required".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_)
            | Self::Unavailable(_)
            | Self::Timeout { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest(message) | Self::Unauthorized(message) => message.clone(),
            Self::NotFound { resource, .. } => format!("{resource} not found"),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            Self::Unavailable(e) => {
                tracing::error!(error = %e, "Database unavailable");
                "Database connection failed".to_string()
            }
            Self::Timeout { seconds } => {
                tracing::error!(timeout_secs = seconds, "Request timed out");
                "Request timed out".to_string()
            }
            Self::Internal { message } => {
                tracing::error!(error = %message, "Internal error");
                "Internal server error".to_string()
            }
        };

        let body = json!({ "success": false, "error": message });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Invalid(e) => Self::Validation(e),
            DbError::Store(StoreError::Duplicate(_)) => Self::BadRequest(DUPLICATE_MESSAGE.to_string()),
            _ => Self::Database(e),
        }
    }
}

impl From<ConnectError> for ApiError {
    fn from(e: ConnectError) -> Self {
        Self::Unavailable(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::Unauthorized(e.to_string()),
            AuthError::Unauthenticated => Self::unauthenticated(),
            AuthError::InvalidResetToken | AuthError::InvalidCode => Self::BadRequest(e.to_string()),
            AuthError::Invalid(e) => Self::Validation(e),
            AuthError::Hashing(message) => Self::Internal { message },
            AuthError::Db(e) => e.into(),
        }
    }
}
