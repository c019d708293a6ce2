//! Persistence contract for derived state.
//!
//! Derived states are keyed by word id rather than carrying sync
//! metadata: they are persisted locally but recomputed, never synced.

use lango_model::{EntityId, WordHeuristicState, WordMlState};
use lango_sync::RepoResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A record holding state for exactly one word.
pub trait WordKeyed: Clone {
    /// The word this record belongs to.
    fn word_id(&self) -> EntityId;
}

impl WordKeyed for WordHeuristicState {
    fn word_id(&self) -> EntityId {
        self.word_id
    }
}

impl WordKeyed for WordMlState {
    fn word_id(&self) -> EntityId {
        self.word_id
    }
}

/// Local persistence for one derived-state kind.
pub trait StateRepository<S>: Send + Sync {
    /// Creates backing storage if it does not exist yet.
    fn create_tables(&self) -> RepoResult<()>;

    /// Upserts a batch of states, keyed by word id.
    fn save(&self, states: &[S]) -> RepoResult<()>;

    /// Loads every state.
    fn get_all(&self) -> RepoResult<Vec<S>>;
}

/// An in-memory state repository for tests.
#[derive(Debug, Default)]
pub struct MemoryStateRepository<S> {
    states: RwLock<HashMap<EntityId, S>>,
}

impl<S: WordKeyed> MemoryStateRepository<S> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Number of states currently stored.
    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    /// True when no states are stored.
    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

impl<S: WordKeyed + Send + Sync> StateRepository<S> for MemoryStateRepository<S> {
    fn create_tables(&self) -> RepoResult<()> {
        Ok(())
    }

    fn save(&self, states: &[S]) -> RepoResult<()> {
        let mut map = self.states.write();
        for state in states {
            map.insert(state.word_id(), state.clone());
        }
        Ok(())
    }

    fn get_all(&self) -> RepoResult<Vec<S>> {
        Ok(self.states.read().values().cloned().collect())
    }
}
