//! # Lango State
//!
//! Derived per-word study state, recomputed from evaluation history.
//!
//! This crate provides:
//! - The [`HeuristicEngine`]: SM-2-style interval/easiness scheduling
//! - The [`MlEngine`]: feature engineering over evaluation history plus
//!   the [`Classifier`] scoring seam
//! - The [`StateRepository`] persistence contract for derived state
//!
//! ## Key Invariants
//!
//! - Recomputation is a pure replay: the same evaluation history always
//!   yields bit-identical state
//! - A state is dirty exactly when its `repetitions_count` differs from
//!   the live evaluation count for its word
//! - A failed recompute leaves the word's previous state intact

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod error;
mod heuristic;
mod ml;
mod repository;

pub use classifier::Classifier;
pub use error::{StateError, StateResult};
pub use heuristic::{replay_history, HeuristicEngine};
pub use ml::{compute_features, Features, MlEngine};
pub use repository::{MemoryStateRepository, StateRepository, WordKeyed};
