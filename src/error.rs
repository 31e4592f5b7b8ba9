//! Error types for board operations

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// The principal does not own the parent resource of the scope
    #[error("not authorized to access {resource} {id}")]
    Unauthorized { resource: &'static str, id: i64 },

    /// A payload field failed validation
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// The referenced row does not exist
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// The underlying database operation failed
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl BoardError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        BoardError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Caller-facing errors are reported without a cause chain and exit with code 1
    pub fn is_user_error(&self) -> bool {
        !matches!(self, BoardError::Store(_))
    }
}
