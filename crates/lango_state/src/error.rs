//! Error types for derived-state recomputation.

use lango_sync::RepositoryError;
use thiserror::Error;

/// Result type for derived-state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while recomputing derived state.
#[derive(Error, Debug)]
pub enum StateError {
    /// Local persistence failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The classifier failed to score a feature vector. The affected
    /// word keeps its previous state.
    #[error("classifier error: {0}")]
    Classifier(String),
}
