//! Cross-thread and property tests for the sync engine.

use chrono::{DateTime, Utc};
use lango_sync::{
    merge, MemoryRepository, PushAck, SyncBackend, SyncConfig, SyncEngine, SyncResult,
};
use lango_model::{SyncMeta, Tracked, Word, WordSource};
use proptest::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn word(text: &str) -> Word {
    Word::new(text, "x", "es", "en", WordSource::User, Utc::now())
}

/// A backend whose push blocks on a pair of barriers, so a test can act
/// while a sync is provably in flight.
struct BlockingBackend {
    entered: Barrier,
    release: Barrier,
    push_calls: AtomicU64,
    pull_calls: AtomicU64,
}

impl BlockingBackend {
    fn new() -> Self {
        Self {
            entered: Barrier::new(2),
            release: Barrier::new(2),
            push_calls: AtomicU64::new(0),
            pull_calls: AtomicU64::new(0),
        }
    }
}

impl SyncBackend<Word> for BlockingBackend {
    fn push(&self, items: &[Word]) -> SyncResult<Option<Vec<PushAck>>> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.entered.wait();
        self.release.wait();
        Ok(Some(
            items
                .iter()
                .map(|w| PushAck {
                    id: w.id,
                    updated_at: Utc::now(),
                })
                .collect(),
        ))
    }

    fn pull(&self, _since: DateTime<Utc>) -> SyncResult<Vec<Word>> {
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

#[test]
fn concurrent_sync_triggers_one_round_trip() {
    let backend = Arc::new(BlockingBackend::new());
    let repo = Arc::new(MemoryRepository::new());
    let engine = Arc::new(SyncEngine::new(
        backend.clone(),
        repo,
        SyncConfig::default(),
    ));

    let words = vec![word("uno")];

    let worker = {
        let engine = engine.clone();
        let words = words.clone();
        thread::spawn(move || engine.sync(&words))
    };

    // The worker's push is now in flight; a second trigger must be a
    // silent no-op, not a queued retry.
    backend.entered.wait();
    let second = engine.sync(&words).unwrap();
    assert!(second.skipped);
    assert!(second.merged.is_empty());

    backend.release.wait();
    let first = worker.join().unwrap().unwrap();
    assert!(!first.skipped);
    assert_eq!(first.pushed, 1);

    assert_eq!(backend.push_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.pull_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn guard_releases_after_failed_cycle() {
    struct FailingBackend;

    impl SyncBackend<Word> for FailingBackend {
        fn push(&self, _items: &[Word]) -> SyncResult<Option<Vec<PushAck>>> {
            Err(lango_sync::SyncError::transport("offline"))
        }

        fn pull(&self, _since: DateTime<Utc>) -> SyncResult<Vec<Word>> {
            Ok(Vec::new())
        }
    }

    let engine = SyncEngine::new(
        Arc::new(FailingBackend),
        Arc::new(MemoryRepository::new()),
        SyncConfig::default(),
    );

    let words = vec![word("uno")];
    assert!(engine.sync(&words).is_err());
    // A failed cycle must not leave the guard held.
    let retry = engine.sync(&[]).unwrap();
    assert!(!retry.skipped);
}

proptest! {
    /// `merge(L, S)` never drops an element of `L` with `synced == false`.
    #[test]
    fn merge_preserves_unsynced_local_records(
        synced_flags in proptest::collection::vec(any::<bool>(), 0..24),
        overlap_flags in proptest::collection::vec(any::<bool>(), 0..24),
        server_only_count in 0usize..8,
    ) {
        let now = Utc::now();
        let local: Vec<Word> = synced_flags
            .iter()
            .enumerate()
            .map(|(i, &synced)| {
                let mut w = word(&format!("palabra-{i}"));
                if synced {
                    w.mark_synced(now);
                }
                w
            })
            .collect();

        let mut server: Vec<Word> = local
            .iter()
            .zip(overlap_flags.iter().cycle())
            .filter(|(_, &overlaps)| overlaps)
            .map(|(w, _)| {
                let mut server_copy = w.clone();
                server_copy.translation = "server-edit".into();
                server_copy.meta = SyncMeta::remote(now);
                server_copy
            })
            .collect();
        for i in 0..server_only_count {
            let mut w = word(&format!("remota-{i}"));
            w.meta = SyncMeta::remote(now);
            server.push(w);
        }

        let merged = merge(&local, server);

        for original in local.iter().filter(|w| !w.synced()) {
            let survivor = merged.iter().find(|m| m.id == original.id);
            prop_assert!(survivor.is_some(), "unsynced local record dropped");
        }
        prop_assert!(merged.len() >= local.len());
    }
}
