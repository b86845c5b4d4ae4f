//! Error types for the sharing backend.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Common error type for the sharing backend.
///
/// Service-level failures carry the human-readable summary that ends up in
/// the HTTP error body, so `Conflict`, `NotFound`, `Forbidden` and
/// `BadRequest` display their message verbatim.
#[derive(Error, Debug)]
pub enum SharingError {
    /// Store interaction error.
    #[error("database error: {0}")]
    Database(String),

    /// A record with the same unique key already exists.
    #[error("{0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("{0}")]
    Forbidden(String),

    /// No token was presented.
    #[error("authorization token required")]
    AuthRequired,

    /// Token signature or structure is invalid.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token lifetime is over.
    #[error("token expired at {}", expiration.to_rfc3339())]
    TokenExpired {
        /// Expiration instant carried by the token.
        expiration: DateTime<Utc>,
    },

    /// Token signing failed.
    #[error("token generation error: {0}")]
    TokenGeneration(String),

    /// Password hashing or verification failed.
    #[error("password processing error: {0}")]
    Password(String),

    /// Malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for SharingError {
    fn from(e: sqlx::Error) -> Self {
        SharingError::Database(e.to_string())
    }
}

/// Result type alias for sharing backend operations.
pub type Result<T> = std::result::Result<T, SharingError>;
