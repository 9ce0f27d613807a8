//! Error types for aftercare-api
//!
//! Module-specific error enum using thiserror, with the mapping from
//! error kind to HTTP status and JSON error body in one place.

use aftercare_common::envelope::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

/// Main error type for the aftercare-api module
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Tracker record validation failures (full details list)
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Soft dependency unavailable
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using aftercare-api Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<aftercare_common::Error> for Error {
    fn from(err: aftercare_common::Error) -> Self {
        match err {
            aftercare_common::Error::Database(e) => Error::Database(e),
            aftercare_common::Error::Config(msg) => Error::Config(msg),
            aftercare_common::Error::Validation(details) => Error::Validation(details),
            aftercare_common::Error::NotFound(what) => Error::NotFound(what),
            aftercare_common::Error::Unavailable(what) => Error::Unavailable(what),
            other => Error::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::Validation(details) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Validation failed", "Invalid tracker data provided")
                    .with_details(details),
            ),
            Error::NotFound(message) => {
                (StatusCode::NOT_FOUND, ErrorBody::new("Not found", message))
            }
            Error::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody::new("Service unavailable", message),
            ),
            Error::Database(err) => {
                tracing::error!(error = %err, "Database error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error", "An unexpected error occurred"),
                )
            }
            Error::Config(message) | Error::Internal(message) => {
                tracing::error!(error = %message, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error", "An unexpected error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
