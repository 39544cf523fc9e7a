//! Storage error types.

use std::time::Duration;

use thiserror::Error;

use super::OBJECT_STORE_BACKEND;

/// Storage operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the call.
    #[error("{backend} is unreachable: {reason}")]
    Unreachable {
        /// Backend name.
        backend: &'static str,
        /// Underlying failure.
        reason: String,
    },

    /// The remote call did not finish within the configured bound.
    #[error("{backend} call timed out after {secs}s")]
    Timeout {
        /// Backend name.
        backend: &'static str,
        /// Timeout that elapsed, in seconds.
        secs: u64,
    },

    /// Key not found in storage.
    #[error("key not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Storage client configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// A stored record could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl StorageError {
    /// Create an unreachable error.
    #[must_use]
    pub fn unreachable(backend: &'static str, reason: impl ToString) -> Self {
        Self::Unreachable {
            backend,
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(backend: &'static str, limit: Duration) -> Self {
        Self::Timeout {
            backend,
            secs: limit.as_secs(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::unreachable(OBJECT_STORE_BACKEND, err),
        }
    }
}
