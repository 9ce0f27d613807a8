//! Error types for aftercare-ui

use aftercare_common::envelope::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

/// Main error type for the aftercare-ui module
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backend sync transport or response errors
    #[error("{0}")]
    Sync(String),

    /// Backend unreachable while serving a proxied read
    #[error("Backend unavailable: {0}")]
    Upstream(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using aftercare-ui Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<aftercare_common::Error> for Error {
    fn from(err: aftercare_common::Error) -> Self {
        match err {
            aftercare_common::Error::Config(msg) => Error::Config(msg),
            aftercare_common::Error::Io(e) => Error::Io(e),
            other => Error::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::Upstream(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody::new("Backend unavailable", message),
            ),
            other => {
                tracing::error!(error = %other, "Internal error while handling UI request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error", "An unexpected error occurred"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
