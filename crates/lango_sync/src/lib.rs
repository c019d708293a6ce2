//! # Lango Sync
//!
//! Generic push/merge/pull synchronization for Lango entities.
//!
//! This crate provides:
//! - The [`SyncEngine`], one instance per entity kind, implementing the
//!   push → pull-delta → merge → diff-persist cycle
//! - The [`SyncBackend`] transport contract (push batches, pull deltas)
//! - The [`Repository`] local persistence contract
//! - In-memory implementations of both contracts for tests
//!
//! ## Key Invariants
//!
//! - Server is authoritative for every acknowledged record
//! - A merge never drops an unsynced local record
//! - One sync in flight per entity kind; concurrent triggers are silent
//!   no-ops, never queued
//! - A failed push aborts the cycle before any pull or persist

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod config;
mod engine;
mod error;
mod repository;

pub use backend::{MockBackend, PushAck, SyncBackend};
pub use config::SyncConfig;
pub use engine::{merge, SyncEngine, SyncOutcome};
pub use error::{SyncError, SyncResult};
pub use repository::{MemoryRepository, RepoResult, Repository, RepositoryError};
