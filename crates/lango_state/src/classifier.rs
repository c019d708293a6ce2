//! The external classifier seam.

use crate::error::StateResult;

/// A grade classifier over the six-element feature vector produced by
/// [`compute_features`](crate::compute_features).
///
/// Implementations are expected to be pure and side-effect free; the
/// engine calls `score` once per dirty word per recomputation pass. A
/// returned error leaves that word's previous state in place.
pub trait Classifier: Send + Sync {
    /// Returns `[p1, p2, p3]`: the probability of the next recall being
    /// graded 1, 2 or 3.
    fn score(&self, features: &[f64; 6]) -> StateResult<[f64; 3]>;
}
