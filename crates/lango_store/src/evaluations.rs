//! The evaluation store.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use lango_model::{EntityId, Evaluation};
use lango_sync::{Repository, SyncBackend, SyncConfig, SyncEngine, SyncError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// In-memory source of truth for per-card evaluations.
pub struct EvaluationStore {
    evaluations: RwLock<Vec<Evaluation>>,
    repository: Arc<dyn Repository<Evaluation>>,
    engine: SyncEngine<Evaluation>,
}

impl EvaluationStore {
    /// Creates a store over the given transport and repository.
    pub fn new(
        backend: Arc<dyn SyncBackend<Evaluation>>,
        repository: Arc<dyn Repository<Evaluation>>,
        config: SyncConfig,
    ) -> Self {
        Self {
            evaluations: RwLock::new(Vec::new()),
            engine: SyncEngine::new(backend, repository.clone(), config),
            repository,
        }
    }

    /// Loads persisted evaluations into memory.
    pub fn load(&self) -> StoreResult<()> {
        self.repository.create_tables()?;
        *self.evaluations.write() = self.repository.get_all()?;
        Ok(())
    }

    /// Snapshot of all evaluations.
    pub fn all(&self) -> Vec<Evaluation> {
        self.evaluations.read().clone()
    }

    /// Records a batch of evaluations, typically one session's worth.
    pub fn add_evaluations(&self, batch: Vec<Evaluation>) -> StoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.repository.save(&batch)?;
        self.evaluations.write().extend(batch);
        Ok(())
    }

    /// A word's evaluations in chronological order.
    pub fn for_word(&self, word_id: EntityId) -> Vec<Evaluation> {
        let mut history: Vec<Evaluation> = self
            .evaluations
            .read()
            .iter()
            .filter(|e| e.word_id == word_id)
            .cloned()
            .collect();
        history.sort_by_key(|e| e.date);
        history
    }

    /// Live evaluation count for one word; the derived-state dirty key.
    pub fn count_for_word(&self, word_id: EntityId) -> usize {
        self.evaluations
            .read()
            .iter()
            .filter(|e| e.word_id == word_id)
            .count()
    }

    /// Timestamp of a word's most recent evaluation.
    pub fn latest_for_word(&self, word_id: EntityId) -> Option<DateTime<Utc>> {
        self.evaluations
            .read()
            .iter()
            .filter(|e| e.word_id == word_id)
            .map(|e| e.date)
            .max()
    }

    /// Triggers one sync cycle. Transport failures are swallowed; only
    /// auth failures surface.
    pub fn sync(&self) -> StoreResult<()> {
        let snapshot = self.all();
        match self.engine.sync(&snapshot) {
            Ok(outcome) => {
                if !outcome.skipped {
                    *self.evaluations.write() = outcome.merged;
                }
                Ok(())
            }
            Err(SyncError::AuthRequired) => Err(StoreError::AuthRequired),
            Err(err) => {
                warn!(error = %err, "evaluation sync failed, will retry on next trigger");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lango_model::Grade;
    use lango_sync::{MemoryRepository, MockBackend};
    use uuid::Uuid;

    fn store() -> EvaluationStore {
        EvaluationStore::new(
            Arc::new(MockBackend::new()),
            Arc::new(MemoryRepository::new()),
            SyncConfig::default(),
        )
    }

    fn eval(word_id: EntityId, grade: Grade, age: Duration) -> Evaluation {
        Evaluation::new(word_id, Uuid::new_v4(), grade, Utc::now() - age)
    }

    #[test]
    fn for_word_is_chronological() {
        let store = store();
        let word_id = Uuid::new_v4();
        store
            .add_evaluations(vec![
                eval(word_id, Grade::Good, Duration::hours(1)),
                eval(word_id, Grade::Bad, Duration::hours(10)),
                eval(Uuid::new_v4(), Grade::Fair, Duration::hours(5)),
            ])
            .unwrap();

        let history = store.for_word(word_id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].grade, Grade::Bad);
        assert_eq!(history[1].grade, Grade::Good);
        assert_eq!(store.count_for_word(word_id), 2);
    }

    #[test]
    fn latest_for_word_picks_newest() {
        let store = store();
        let word_id = Uuid::new_v4();
        let newest = eval(word_id, Grade::Good, Duration::hours(1));
        let newest_date = newest.date;
        store
            .add_evaluations(vec![eval(word_id, Grade::Bad, Duration::hours(9)), newest])
            .unwrap();
        assert_eq!(store.latest_for_word(word_id), Some(newest_date));
        assert_eq!(store.latest_for_word(Uuid::new_v4()), None);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let store = store();
        store.add_evaluations(Vec::new()).unwrap();
        assert!(store.all().is_empty());
    }
}
