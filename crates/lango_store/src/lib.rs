//! # Lango Store
//!
//! One stateful store per synced entity kind: words, sessions,
//! evaluations, suggestions.
//!
//! Each store is the single in-memory source of truth for its kind,
//! constructed once per authenticated session and shared by `Arc`
//! (dependency injection, no ambient globals). It wraps one
//! [`SyncEngine`](lango_sync::SyncEngine); transport failures during
//! sync are logged and swallowed (items stay unsynced and are retried
//! on the next trigger), with authentication failures the single
//! exception surfaced to the caller.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod evaluations;
mod sessions;
mod suggestions;
mod words;

pub use error::{StoreError, StoreResult};
pub use evaluations::EvaluationStore;
pub use sessions::SessionStore;
pub use suggestions::SuggestionStore;
pub use words::WordStore;
