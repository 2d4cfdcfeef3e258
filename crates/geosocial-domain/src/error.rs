//! Domain error types for community search operations.

use thiserror::Error;

/// Domain-specific errors for community search operations.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Query mode is neither similarity nor distance.
    #[error("invalid query mode: {mode}")]
    InvalidQueryMode { mode: String },

    /// A query parameter is out of range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Invalid identifier format.
    #[error("invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    /// User is not known to the graph.
    #[error("user not found: {user}")]
    UserNotFound { user: String },

    /// Failure reported by a graph backend.
    #[error("graph access error: {message}")]
    GraphAccess { message: String },

    /// Failure serializing a search result.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns true when the error was raised before any traversal started.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQueryMode { .. } | Self::InvalidParameter { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
