//! Error types for sync operations.

use crate::repository::RepositoryError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a sync cycle.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network or transport failure.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the next trigger may succeed.
        retryable: bool,
    },

    /// The server refused the push batch without acknowledging any item.
    #[error("push rejected by server")]
    PushRejected,

    /// Authentication expired (HTTP 401). The only sync failure that
    /// must reach the caller unmodified, for the re-auth flow.
    #[error("authentication required")]
    AuthRequired,

    /// Local repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Malformed server response.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SyncError {
    /// Shorthand for a retryable transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        SyncError::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Whether the next sync trigger may succeed without intervention.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::PushRejected => true,
            SyncError::AuthRequired => false,
            SyncError::Repository(_) => false,
            SyncError::Protocol(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_required_is_not_retryable() {
        assert!(!SyncError::AuthRequired.is_retryable());
        assert!(SyncError::transport("connection reset").is_retryable());
        assert!(SyncError::PushRejected.is_retryable());
    }
}
