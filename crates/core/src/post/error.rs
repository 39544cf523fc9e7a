//! Post error types.

use imgboard_shared::AppError;
use thiserror::Error;

/// Post operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    /// A required upload field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// No backend holds the requested image.
    #[error("image not found: {0}")]
    NotFound(String),
}

impl PostError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::MissingField(_) => Self::Validation(err.to_string()),
            PostError::NotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}
