//! Error type system for the authentication service
//!
//! This module provides a single error type with:
//! - HTTP status code mapping
//! - Wire-format rendering as `{"errors": [...]}`
//! - Generic messages for server-side failures (no internal detail leakage)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main error type for the authentication service
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Request-level errors
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not authenticated")]
    Unauthenticated,

    // System-level errors
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status this error maps to on the wire
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AuthError::Validation(_) | AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }

            // 500 Internal Server Error
            AuthError::Config(_)
            | AuthError::Database(_)
            | AuthError::Io(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "Validation",
            AuthError::DuplicateEmail => "DuplicateEmail",
            AuthError::InvalidCredentials => "InvalidCredentials",
            AuthError::Unauthenticated => "Unauthenticated",
            AuthError::Config(_) => "Config",
            AuthError::Database(_) => "Database",
            AuthError::Io(_) => "Io",
            AuthError::Internal(_) => "Internal",
        }
    }

    /// Get the client-facing messages for this error
    ///
    /// Server-side failures all collapse to a single generic message; the
    /// detail stays in the logs.
    pub fn messages(&self) -> Vec<String> {
        match self {
            AuthError::Validation(messages) => messages.clone(),
            AuthError::DuplicateEmail => vec!["Email already registered".to_string()],
            AuthError::InvalidCredentials => vec!["Invalid credentials".to_string()],
            AuthError::Unauthenticated => vec!["Not authenticated".to_string()],
            AuthError::Config(_)
            | AuthError::Database(_)
            | AuthError::Io(_)
            | AuthError::Internal(_) => vec!["Server error".to_string()],
        }
    }
}

/// Body shape shared by every error reply
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error messages
    pub errors: Vec<String>,
}

impl ErrorResponse {
    /// Create an error response from an AuthError
    pub fn from_error(error: &AuthError) -> Self {
        Self {
            errors: error.messages(),
        }
    }
}

/// Implement IntoResponse for AuthError to enable automatic error handling in Axum
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with AuthError
pub type Result<T> = std::result::Result<T, AuthError>;
