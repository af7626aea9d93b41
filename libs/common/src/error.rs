//! Custom error types for the common library
//!
//! Each infrastructure concern gets its own error enum so services can map
//! them onto their own response types.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors raised while storing or reading admin sessions
#[derive(Error, Debug)]
pub enum SessionError {
    /// Redis could not be reached or rejected the command
    #[error("Session cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A stored session record could not be encoded or decoded
    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors raised while issuing or verifying admin tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// The signing secret is missing or unusable
    #[error("Token configuration error: {0}")]
    Configuration(String),

    /// The token is malformed, forged or expired
    #[error("Invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}
