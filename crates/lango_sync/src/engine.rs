//! The push/merge/pull sync cycle.

use crate::backend::SyncBackend;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use lango_model::{EntityId, Tracked};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Outcome of one sync cycle.
#[derive(Debug, Clone)]
pub struct SyncOutcome<E> {
    /// The merged list, the caller's new in-memory state. Empty when
    /// the cycle was skipped.
    pub merged: Vec<E>,
    /// Records pushed and acknowledged by the server.
    pub pushed: usize,
    /// Records received from the pull delta.
    pub pulled: usize,
    /// Records written to the local repository.
    pub persisted: usize,
    /// True when another sync was already in flight and this call was a
    /// silent no-op.
    pub skipped: bool,
}

impl<E> SyncOutcome<E> {
    fn skipped() -> Self {
        Self {
            merged: Vec::new(),
            pushed: 0,
            pulled: 0,
            persisted: 0,
            skipped: true,
        }
    }
}

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Server-authoritative whole-record merge.
///
/// Ids present in both lists take the server record, marked synced; ids
/// only on the server are inserted as new, already-synced records; ids
/// only local (not yet acknowledged) are preserved unchanged. Local
/// ordering is kept, server-only records append in pull order.
pub fn merge<E: Tracked>(local: &[E], remote: Vec<E>) -> Vec<E> {
    let mut remote_by_id: HashMap<EntityId, E> = HashMap::with_capacity(remote.len());
    let mut remote_order: Vec<EntityId> = Vec::with_capacity(remote.len());
    for mut record in remote {
        let at = record.meta().effective_updated_at();
        record.mark_synced(at);
        remote_order.push(record.id());
        remote_by_id.insert(record.id(), record);
    }

    let mut merged: Vec<E> = local
        .iter()
        .map(|item| match remote_by_id.remove(&item.id()) {
            Some(server) => server,
            None => item.clone(),
        })
        .collect();

    for id in remote_order {
        if let Some(server) = remote_by_id.remove(&id) {
            merged.push(server);
        }
    }
    merged
}

/// One sync engine per entity kind.
///
/// Holds the single-flight guard; a `sync` triggered while one is
/// already running returns immediately with a skipped outcome. Callers
/// re-trigger on the next mutation or screen focus to make progress.
pub struct SyncEngine<E: Tracked> {
    backend: Arc<dyn SyncBackend<E>>,
    repository: Arc<dyn Repository<E>>,
    config: SyncConfig,
    in_flight: AtomicBool,
}

impl<E: Tracked + Send + Sync> SyncEngine<E> {
    /// Creates an engine over the given transport and repository.
    pub fn new(
        backend: Arc<dyn SyncBackend<E>>,
        repository: Arc<dyn Repository<E>>,
        config: SyncConfig,
    ) -> Self {
        Self {
            backend,
            repository,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs one sync cycle over `local`, the caller's current in-memory
    /// list.
    ///
    /// On success the caller replaces its state with `merged`. On any
    /// error the caller keeps its previous state: unacknowledged items
    /// remain unsynced and are re-pushed on the next trigger.
    pub fn sync(&self, local: &[E]) -> SyncResult<SyncOutcome<E>> {
        let _guard = match InFlightGuard::acquire(&self.in_flight) {
            Some(guard) => guard,
            None => {
                debug!("sync already in flight, skipping");
                return Ok(SyncOutcome::skipped());
            }
        };

        let mut working: Vec<E> = local.to_vec();

        // Metadata as of invocation; the persistence diff at the end of
        // the cycle is computed against this snapshot so push acks and
        // merge results are both captured.
        let pre_sync: HashMap<EntityId, lango_model::SyncMeta> = working
            .iter()
            .map(|item| (item.id(), *item.meta()))
            .collect();

        // Push unsynced items in batches. Any failure aborts the cycle
        // before pull/merge/persist; acks from earlier batches of the
        // same failed cycle are dropped with it, so every item is
        // re-pushed next time (server acks are idempotent).
        let unsynced: Vec<EntityId> = working
            .iter()
            .filter(|item| !item.synced())
            .map(|item| item.id())
            .collect();

        let mut pushed = 0usize;
        for batch_ids in unsynced.chunks(self.config.push_batch_size) {
            let batch: Vec<E> = working
                .iter()
                .filter(|item| batch_ids.contains(&item.id()))
                .cloned()
                .collect();
            let acks = self
                .backend
                .push(&batch)?
                .ok_or(SyncError::PushRejected)?;
            for ack in acks {
                if let Some(item) = working.iter_mut().find(|item| item.id() == ack.id) {
                    item.mark_synced(ack.updated_at);
                    pushed += 1;
                }
            }
        }

        // Pull everything the server changed since our newest record.
        let since = latest_updated_at(&working);
        let remote = self.backend.pull(since)?;
        let pulled = remote.len();

        // Merge, then persist only the records whose sync metadata
        // changed over the cycle, plus newly inserted ids.
        let merged = merge(&working, remote);

        let changed: Vec<E> = merged
            .iter()
            .filter(|item| match pre_sync.get(&item.id()) {
                Some(before) => before != item.meta(),
                None => true,
            })
            .cloned()
            .collect();

        if !changed.is_empty() {
            self.repository.save(&changed)?;
        }

        let persisted = changed.len();
        debug!(pushed, pulled, persisted, "sync cycle complete");

        Ok(SyncOutcome {
            merged,
            pushed,
            pulled,
            persisted,
            skipped: false,
        })
    }
}

/// The newest known modification time across the list, used as the pull
/// delta cursor. Epoch when the list is empty, so a fresh device pulls
/// everything.
fn latest_updated_at<E: Tracked>(items: &[E]) -> DateTime<Utc> {
    items
        .iter()
        .map(|item| item.meta().effective_updated_at())
        .max()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockBackend, PushAck};
    use crate::repository::MemoryRepository;
    use chrono::{Duration, TimeZone};
    use lango_model::{SyncMeta, Word, WordSource};

    fn word(text: &str) -> Word {
        Word::new(text, "x", "es", "en", WordSource::User, Utc::now())
    }

    fn remote_word(text: &str, updated_at: DateTime<Utc>) -> Word {
        let mut w = word(text);
        w.meta = SyncMeta::remote(updated_at);
        w
    }

    fn engine(
        backend: Arc<MockBackend<Word>>,
        repo: Arc<MemoryRepository<Word>>,
    ) -> SyncEngine<Word> {
        SyncEngine::new(backend, repo, SyncConfig::default())
    }

    #[test]
    fn push_marks_acked_items_synced() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());
        let engine = engine(backend.clone(), repo.clone());

        let local = vec![word("uno"), word("dos")];
        let outcome = engine.sync(&local).unwrap();

        assert!(!outcome.skipped);
        assert_eq!(outcome.pushed, 2);
        assert!(outcome.merged.iter().all(|w| w.synced()));
        // Both items changed metadata, so both were persisted.
        assert_eq!(outcome.persisted, 2);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn push_failure_skips_pull_and_persist() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());
        backend.queue_push_failure();
        let engine = engine(backend.clone(), repo.clone());

        let local = vec![word("uno")];
        let result = engine.sync(&local);

        assert!(result.is_err());
        assert_eq!(backend.pull_calls(), 0);
        assert_eq!(repo.save_calls(), 0);
        // Caller keeps its list; the item is still unsynced.
        assert!(!local[0].synced());
    }

    #[test]
    fn null_ack_list_aborts_like_a_failure() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());
        backend.queue_push(Ok(None));
        let engine = engine(backend.clone(), repo.clone());

        let result = engine.sync(&[word("uno")]);
        assert!(matches!(result, Err(SyncError::PushRejected)));
        assert_eq!(backend.pull_calls(), 0);
    }

    #[test]
    fn auth_failure_propagates_unmodified() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());
        backend.queue_push_auth_failure();
        let engine = engine(backend, repo);

        let result = engine.sync(&[word("uno")]);
        assert!(matches!(result, Err(SyncError::AuthRequired)));
    }

    #[test]
    fn nothing_to_push_still_pulls() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());
        let engine = engine(backend.clone(), repo.clone());

        let outcome = engine.sync(&[]).unwrap();
        assert_eq!(outcome.pushed, 0);
        assert_eq!(backend.push_calls(), 0);
        assert_eq!(backend.pull_calls(), 1);
    }

    #[test]
    fn pull_inserts_server_only_records_as_synced() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());
        let server_time = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        backend.queue_pull(Ok(vec![remote_word("tres", server_time)]));
        let engine = engine(backend, repo.clone());

        let outcome = engine.sync(&[]).unwrap();
        assert_eq!(outcome.pulled, 1);
        assert_eq!(outcome.merged.len(), 1);
        assert!(outcome.merged[0].synced());
        assert_eq!(outcome.merged[0].meta.updated_at, Some(server_time));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn server_record_wins_for_shared_ids() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());

        let mut local = word("uno");
        local.mark_synced(Utc::now() - Duration::hours(2));

        let mut server = local.clone();
        server.translation = "one (updated elsewhere)".into();
        server.meta = SyncMeta::remote(Utc::now());
        backend.queue_pull(Ok(vec![server.clone()]));

        let engine = engine(backend, repo);
        let outcome = engine.sync(&[local]).unwrap();

        assert_eq!(outcome.merged.len(), 1);
        assert_eq!(outcome.merged[0].translation, "one (updated elsewhere)");
        assert!(outcome.merged[0].synced());
    }

    #[test]
    fn sync_twice_with_no_changes_persists_nothing() {
        let backend = Arc::new(MockBackend::new());
        let repo = Arc::new(MemoryRepository::new());
        let engine = engine(backend, repo.clone());

        let outcome = engine.sync(&[word("uno")]).unwrap();
        let writes_after_first = repo.save_calls();
        assert_eq!(writes_after_first, 1);

        let outcome = engine.sync(&outcome.merged).unwrap();
        assert_eq!(outcome.pushed, 0);
        assert_eq!(outcome.persisted, 0);
        assert_eq!(repo.save_calls(), writes_after_first);
    }

    #[test]
    fn pull_cursor_is_newest_known_timestamp() {
        let older = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap();
        let list = vec![remote_word("uno", older), remote_word("dos", newer)];
        assert_eq!(latest_updated_at(&list), newer);
        assert_eq!(latest_updated_at::<Word>(&[]), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn unsynced_local_records_survive_merge() {
        let local_only = word("local");
        let shared = remote_word("shared", Utc::now());
        let merged = merge(
            &[local_only.clone(), shared.clone()],
            vec![shared, remote_word("server", Utc::now())],
        );
        assert_eq!(merged.len(), 3);
        assert!(merged.iter().any(|w| w.id == local_only.id && !w.synced()));
    }
}
