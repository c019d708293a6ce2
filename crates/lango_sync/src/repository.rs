//! Local persistence contract.

use lango_model::{EntityId, Tracked};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;

/// A local persistence failure, opaque to this crate.
#[derive(Debug, Clone, Error)]
#[error("repository error: {0}")]
pub struct RepositoryError(pub String);

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Local persistence for one entity kind.
///
/// The backing implementation (SQL, key-value, file) is opaque to the
/// sync core; only whole-record save/load semantics are required.
pub trait Repository<E>: Send + Sync {
    /// Creates backing storage if it does not exist yet.
    fn create_tables(&self) -> RepoResult<()>;

    /// Upserts a batch of records.
    fn save(&self, items: &[E]) -> RepoResult<()>;

    /// Loads every record.
    fn get_all(&self) -> RepoResult<Vec<E>>;

    /// Upserts a single record.
    fn update(&self, item: &E) -> RepoResult<()>;

    /// Deletes records by id. Only the suggestion store uses this.
    fn delete(&self, ids: &[EntityId]) -> RepoResult<()>;
}

/// An in-memory repository for tests.
///
/// Counts writes so tests can assert that an idempotent sync persists
/// nothing, and can be switched to fail writes for error-path tests.
#[derive(Debug, Default)]
pub struct MemoryRepository<E> {
    records: RwLock<HashMap<EntityId, E>>,
    save_calls: AtomicU64,
    saved_records: AtomicU64,
    fail_writes: AtomicBool,
}

impl<E: Tracked> MemoryRepository<E> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            save_calls: AtomicU64::new(0),
            saved_records: AtomicU64::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Number of `save` calls made so far.
    pub fn save_calls(&self) -> u64 {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Total records written across all `save`/`update` calls.
    pub fn saved_records(&self) -> u64 {
        self.saved_records.load(Ordering::SeqCst)
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Makes every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(RepositoryError("write failure injected".into()))
        } else {
            Ok(())
        }
    }
}

impl<E: Tracked + Send + Sync> Repository<E> for MemoryRepository<E> {
    fn create_tables(&self) -> RepoResult<()> {
        Ok(())
    }

    fn save(&self, items: &[E]) -> RepoResult<()> {
        self.check_writable()?;
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.saved_records
            .fetch_add(items.len() as u64, Ordering::SeqCst);
        let mut records = self.records.write();
        for item in items {
            records.insert(item.id(), item.clone());
        }
        Ok(())
    }

    fn get_all(&self) -> RepoResult<Vec<E>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn update(&self, item: &E) -> RepoResult<()> {
        self.check_writable()?;
        self.saved_records.fetch_add(1, Ordering::SeqCst);
        self.records.write().insert(item.id(), item.clone());
        Ok(())
    }

    fn delete(&self, ids: &[EntityId]) -> RepoResult<()> {
        self.check_writable()?;
        let mut records = self.records.write();
        for id in ids {
            records.remove(id);
        }
        Ok(())
    }
}
