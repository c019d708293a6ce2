//! Error types for the entity stores.

use lango_sync::RepositoryError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that reach callers of a store.
///
/// Transport failures never appear here; they are swallowed at the
/// sync boundary and retried on the next trigger.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Local persistence failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Authentication expired during sync; the caller must run the
    /// re-auth flow before syncing again.
    #[error("authentication required")]
    AuthRequired,
}
