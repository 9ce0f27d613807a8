//! Common error types for the aftercare services

use thiserror::Error;

/// Common result type for aftercare operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the aftercare services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracker record rejected by validation; carries the full failure list
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Soft dependency (cache, database) is not available
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
