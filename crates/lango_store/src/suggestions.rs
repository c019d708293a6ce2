//! The suggestion store.

use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use lango_model::{EntityId, Suggestion, Tracked};
use lango_sync::{Repository, SyncBackend, SyncConfig, SyncEngine, SyncError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// In-memory source of truth for server-suggested words.
///
/// Suggestions are created server-side only; locally they accumulate
/// display counts and terminal flags, and are deleted once the server
/// has acknowledged a terminal state.
pub struct SuggestionStore {
    suggestions: RwLock<Vec<Suggestion>>,
    repository: Arc<dyn Repository<Suggestion>>,
    engine: SyncEngine<Suggestion>,
}

impl SuggestionStore {
    /// Creates a store over the given transport and repository.
    pub fn new(
        backend: Arc<dyn SyncBackend<Suggestion>>,
        repository: Arc<dyn Repository<Suggestion>>,
        config: SyncConfig,
    ) -> Self {
        Self {
            suggestions: RwLock::new(Vec::new()),
            engine: SyncEngine::new(backend, repository.clone(), config),
            repository,
        }
    }

    /// Loads persisted suggestions into memory.
    pub fn load(&self) -> StoreResult<()> {
        self.repository.create_tables()?;
        *self.suggestions.write() = self.repository.get_all()?;
        Ok(())
    }

    /// Snapshot of all pending suggestions.
    pub fn all(&self) -> Vec<Suggestion> {
        self.suggestions.read().clone()
    }

    /// Bumps the display counter after the suggestion was shown.
    pub fn record_display(&self, id: EntityId) -> StoreResult<()> {
        self.mutate(id, |s| s.display_count += 1)
    }

    /// Marks the suggestion dismissed.
    pub fn skip(&self, id: EntityId) -> StoreResult<()> {
        self.mutate(id, |s| s.skipped = true)
    }

    /// Marks the suggestion accepted into the vocabulary.
    pub fn accept(&self, id: EntityId) -> StoreResult<()> {
        self.mutate(id, |s| s.added = true)
    }

    fn mutate(&self, id: EntityId, apply: impl FnOnce(&mut Suggestion)) -> StoreResult<()> {
        let mut suggestions = self.suggestions.write();
        let Some(pos) = suggestions.iter().position(|s| s.id == id) else {
            debug!(suggestion_id = %id, "mutation for unknown suggestion ignored");
            return Ok(());
        };
        let mut updated = suggestions[pos].clone();
        apply(&mut updated);
        updated.mark_local_change(Utc::now());
        self.repository.update(&updated)?;
        suggestions[pos] = updated;
        Ok(())
    }

    /// Triggers one sync cycle, then deletes every suggestion that is
    /// both synced and terminal (skipped or added) from local storage
    /// and memory. Transport failures are swallowed; only auth failures
    /// surface.
    pub fn sync(&self) -> StoreResult<()> {
        let snapshot = self.all();
        match self.engine.sync(&snapshot) {
            Ok(outcome) => {
                if outcome.skipped {
                    return Ok(());
                }
                let (done, mut keep): (Vec<Suggestion>, Vec<Suggestion>) = outcome
                    .merged
                    .into_iter()
                    .partition(|s| s.synced() && s.is_terminal());
                if !done.is_empty() {
                    let ids: Vec<EntityId> = done.iter().map(|s| s.id).collect();
                    self.repository.delete(&ids)?;
                    debug!(count = ids.len(), "dropped terminal suggestions");
                }
                std::mem::swap(&mut *self.suggestions.write(), &mut keep);
                Ok(())
            }
            Err(SyncError::AuthRequired) => Err(StoreError::AuthRequired),
            Err(err) => {
                warn!(error = %err, "suggestion sync failed, will retry on next trigger");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lango_model::SyncMeta;
    use lango_sync::{MemoryRepository, MockBackend};
    use uuid::Uuid;

    fn suggestion(word: &str) -> Suggestion {
        Suggestion {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            word: word.into(),
            translation: "x".into(),
            main_lang: "es".into(),
            translation_lang: "en".into(),
            display_count: 0,
            skipped: false,
            added: false,
            meta: SyncMeta::remote(Utc::now()),
        }
    }

    fn store_with(
        initial: Vec<Suggestion>,
    ) -> (SuggestionStore, Arc<MemoryRepository<Suggestion>>) {
        let repo = Arc::new(MemoryRepository::new());
        repo.save(&initial).unwrap();
        let store = SuggestionStore::new(
            Arc::new(MockBackend::new()),
            repo.clone(),
            SyncConfig::default(),
        );
        store.load().unwrap();
        (store, repo)
    }

    #[test]
    fn record_display_bumps_count_and_unsyncs() {
        let s = suggestion("perro");
        let (store, _) = store_with(vec![s.clone()]);

        store.record_display(s.id).unwrap();
        store.record_display(s.id).unwrap();

        let current = store.all().into_iter().find(|x| x.id == s.id).unwrap();
        assert_eq!(current.display_count, 2);
        assert!(!current.synced());
    }

    #[test]
    fn synced_terminal_suggestions_are_deleted_on_sync() {
        let skipped = suggestion("perro");
        let pending = suggestion("gato");
        let (store, repo) = store_with(vec![skipped.clone(), pending.clone()]);

        store.skip(skipped.id).unwrap();
        // First sync pushes the skip; the ack makes it synced+terminal,
        // so the same cycle drops it.
        store.sync().unwrap();

        let remaining = store.all();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, pending.id);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn unsynced_terminal_suggestions_survive_a_failed_sync() {
        let s = suggestion("perro");
        let (store, _) = store_with(vec![s.clone()]);
        store.accept(s.id).unwrap();

        let backend = Arc::new(MockBackend::new());
        backend.queue_push_failure();
        // Rebuild the store on the failing backend, same repository.
        let repo = Arc::new(MemoryRepository::new());
        repo.save(&store.all()).unwrap();
        let failing = SuggestionStore::new(backend, repo, SyncConfig::default());
        failing.load().unwrap();

        failing.sync().unwrap();
        // Still pending locally until the server acknowledges it.
        assert_eq!(failing.all().len(), 1);
    }

    #[test]
    fn unknown_id_mutation_is_a_no_op() {
        let (store, _) = store_with(vec![]);
        store.skip(Uuid::new_v4()).unwrap();
        assert!(store.all().is_empty());
    }
}
