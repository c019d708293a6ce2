//! The word store.

use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use lango_model::{EntityId, Tracked, Word, WordSource};
use lango_sync::{Repository, SyncBackend, SyncConfig, SyncEngine, SyncError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// In-memory source of truth for the user's vocabulary.
pub struct WordStore {
    words: RwLock<Vec<Word>>,
    repository: Arc<dyn Repository<Word>>,
    engine: SyncEngine<Word>,
}

impl WordStore {
    /// Creates a store over the given transport and repository.
    pub fn new(
        backend: Arc<dyn SyncBackend<Word>>,
        repository: Arc<dyn Repository<Word>>,
        config: SyncConfig,
    ) -> Self {
        Self {
            words: RwLock::new(Vec::new()),
            engine: SyncEngine::new(backend, repository.clone(), config),
            repository,
        }
    }

    /// Loads persisted words into memory.
    pub fn load(&self) -> StoreResult<()> {
        self.repository.create_tables()?;
        *self.words.write() = self.repository.get_all()?;
        Ok(())
    }

    /// Snapshot of all words, including removed ones.
    pub fn all(&self) -> Vec<Word> {
        self.words.read().clone()
    }

    /// Looks up one word by id.
    pub fn get(&self, id: EntityId) -> Option<Word> {
        self.words.read().iter().find(|w| w.id == id).cloned()
    }

    /// Adds a word, or un-removes the existing row when the same
    /// (text, translation) entry already exists. Never creates a
    /// duplicate for a matching entry.
    pub fn add_word(
        &self,
        text: &str,
        translation: &str,
        main_lang: &str,
        translation_lang: &str,
        source: WordSource,
    ) -> StoreResult<Word> {
        let now = Utc::now();
        let mut words = self.words.write();

        if let Some(pos) = words
            .iter()
            .position(|w| w.matches_entry(text, translation))
        {
            let mut revived = words[pos].clone();
            revived.removed = false;
            revived.mark_local_change(now);
            self.repository.update(&revived)?;
            words[pos] = revived.clone();
            debug!(word_id = %revived.id, "re-added existing word");
            return Ok(revived);
        }

        let word = Word::new(text, translation, main_lang, translation_lang, source, now);
        self.repository.update(&word)?;
        words.push(word.clone());
        Ok(word)
    }

    /// Soft-deletes a word. Unknown ids are ignored.
    pub fn remove_word(&self, id: EntityId) -> StoreResult<()> {
        self.mutate(id, |w| w.removed = true)
    }

    /// Sets the active flag. Unknown ids are ignored.
    pub fn set_active(&self, id: EntityId, active: bool) -> StoreResult<()> {
        self.mutate(id, |w| w.active = active)
    }

    /// Replaces a word's user-editable fields (text, translation,
    /// languages). Unknown ids are ignored.
    pub fn update_word(&self, updated: Word) -> StoreResult<()> {
        self.mutate(updated.id, |w| {
            w.text = updated.text.clone();
            w.translation = updated.translation.clone();
            w.main_lang = updated.main_lang.clone();
            w.translation_lang = updated.translation_lang.clone();
        })
    }

    fn mutate(&self, id: EntityId, apply: impl FnOnce(&mut Word)) -> StoreResult<()> {
        let mut words = self.words.write();
        let Some(pos) = words.iter().position(|w| w.id == id) else {
            debug!(word_id = %id, "mutation for unknown word ignored");
            return Ok(());
        };
        let mut updated = words[pos].clone();
        apply(&mut updated);
        updated.mark_local_change(Utc::now());
        self.repository.update(&updated)?;
        words[pos] = updated;
        Ok(())
    }

    /// Triggers one sync cycle. Transport failures are swallowed; only
    /// auth failures surface.
    pub fn sync(&self) -> StoreResult<()> {
        let snapshot = self.all();
        match self.engine.sync(&snapshot) {
            Ok(outcome) => {
                if !outcome.skipped {
                    *self.words.write() = outcome.merged;
                }
                Ok(())
            }
            Err(SyncError::AuthRequired) => Err(StoreError::AuthRequired),
            Err(err) => {
                warn!(error = %err, "word sync failed, will retry on next trigger");
                Ok(())
            }
        }
    }
}
