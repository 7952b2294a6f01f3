//! Error types for staffmail.

use thiserror::Error;

/// Common error type for staffmail.
#[derive(Error, Debug)]
pub enum StaffmailError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant with the
    /// underlying message preserved.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (missing, invalid or expired token).
    #[error("authentication error: {0}")]
    Auth(String),

    /// The caller is not allowed to act on the resource.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Mail transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StaffmailError {
    fn from(e: sqlx::Error) -> Self {
        StaffmailError::Database(e.to_string())
    }
}

/// Result type alias for staffmail operations.
pub type Result<T> = std::result::Result<T, StaffmailError>;
