//! # Lango Model
//!
//! Entity types shared across the Lango core crates.
//!
//! This crate provides:
//! - The sync metadata contract ([`SyncMeta`], [`Tracked`]) carried by
//!   every persisted entity
//! - The four synced entity kinds: [`Word`], [`Session`], [`Evaluation`],
//!   [`Suggestion`]
//! - Derived per-word study state ([`WordHeuristicState`], [`WordMlState`]),
//!   persisted locally but recomputed rather than synced
//! - The ephemeral [`WordSet`] handed to the session layer
//!
//! ## Key Invariants
//!
//! - `synced == true` implies `updated_at` is set
//! - Every local mutation clears `synced` and bumps `locally_updated_at`
//! - Derived states are rebuilt from evaluation history, never hand-edited

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod evaluation;
mod meta;
mod session;
mod state;
mod suggestion;
mod word;
mod word_set;

pub use evaluation::{Evaluation, Grade, InvalidGrade};
pub use meta::{EntityId, SyncMeta, Tracked};
pub use session::{Session, SessionMode, SessionModel};
pub use state::{WordHeuristicState, WordMlState, MAX_EASE_FACTOR, MIN_EASE_FACTOR};
pub use suggestion::Suggestion;
pub use word::{Word, WordSource};
pub use word_set::WordSet;
