//! # Lango Session
//!
//! Word-set selection and study-session orchestration.
//!
//! This crate provides:
//! - The [`WordSetStrategy`] contract and its five implementations:
//!   heuristic, ML, hybrid, random, oldest-first
//! - The [`SessionOrchestrator`]: builds the word set at session start,
//!   accumulates grades, and on completion emits one session record and
//!   one evaluation per graded card into the entity stores
//!
//! Ranking determines membership only; the orchestrator re-shuffles the
//! selected words before handing them to the UI.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod orchestrator;
pub mod strategy;

pub use error::{SessionError, SessionResult};
pub use orchestrator::{SessionConfig, SessionOrchestrator};
pub use strategy::{
    strategy_for, HeuristicStrategy, HybridStrategy, MlStrategy, OldestStrategy, RandomStrategy,
    StrategyInput, WordSetStrategy,
};
