//! Error types for session orchestration.

use lango_state::StateError;
use lango_store::StoreError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while building or closing a session.
///
/// Session misuse (grading without an active session, finishing with no
/// grades) is a no-op, never an error.
#[derive(Error, Debug)]
pub enum SessionError {
    /// An entity store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Derived-state recomputation failed.
    #[error(transparent)]
    State(#[from] StateError),
}
