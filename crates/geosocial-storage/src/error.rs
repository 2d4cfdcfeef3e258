//! Storage error types.

use geosocial_domain::DomainError;
use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// User not found.
    #[error("user not found: {user}")]
    UserNotFound { user: String },

    /// User already exists.
    #[error("user already exists: {user}")]
    UserAlreadyExists { user: String },

    /// Keyword not attached to the user.
    #[error("keyword '{keyword}' not found for user {user}")]
    KeywordNotFound { user: String, keyword: String },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl From<DomainError> for StorageError {
    fn from(err: DomainError) -> Self {
        StorageError::InvalidInput {
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UserNotFound { user } => DomainError::UserNotFound { user },
            other => DomainError::GraphAccess {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
