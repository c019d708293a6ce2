//! Remote transport contract.

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use lango_model::EntityId;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Server acknowledgement of one pushed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushAck {
    /// The acknowledged entity.
    pub id: EntityId,
    /// Server-assigned modification time.
    pub updated_at: DateTime<Utc>,
}

/// Remote endpoints for one entity kind.
///
/// Abstracts the HTTP layer (and its authentication) away from the sync
/// core; implementations apply the timeouts from
/// [`SyncConfig`](crate::SyncConfig).
pub trait SyncBackend<E>: Send + Sync {
    /// Pushes a batch of unsynced records. `Ok(None)` means the server
    /// refused the batch without acknowledging anything.
    fn push(&self, items: &[E]) -> SyncResult<Option<Vec<PushAck>>>;

    /// Fetches every server-side record updated since `since`.
    fn pull(&self, since: DateTime<Utc>) -> SyncResult<Vec<E>>;
}

/// A scripted backend for tests.
///
/// Push acks and pull payloads are consumed in FIFO order; an empty
/// queue yields an empty (but successful) response. Call counters let
/// tests assert on round trips.
pub struct MockBackend<E> {
    push_acks: Mutex<VecDeque<SyncResult<Option<Vec<PushAck>>>>>,
    pull_batches: Mutex<VecDeque<SyncResult<Vec<E>>>>,
    push_calls: AtomicU64,
    pull_calls: AtomicU64,
}

impl<E> MockBackend<E> {
    /// Creates a backend that acknowledges everything and pulls nothing.
    pub fn new() -> Self {
        Self {
            push_acks: Mutex::new(VecDeque::new()),
            pull_batches: Mutex::new(VecDeque::new()),
            push_calls: AtomicU64::new(0),
            pull_calls: AtomicU64::new(0),
        }
    }

    /// Queues the response for the next push call.
    pub fn queue_push(&self, response: SyncResult<Option<Vec<PushAck>>>) {
        self.push_acks.lock().push_back(response);
    }

    /// Queues the response for the next pull call.
    pub fn queue_pull(&self, response: SyncResult<Vec<E>>) {
        self.pull_batches.lock().push_back(response);
    }

    /// Number of push round trips so far.
    pub fn push_calls(&self) -> u64 {
        self.push_calls.load(Ordering::SeqCst)
    }

    /// Number of pull round trips so far.
    pub fn pull_calls(&self) -> u64 {
        self.pull_calls.load(Ordering::SeqCst)
    }
}

impl<E> Default for MockBackend<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: lango_model::Tracked + Send + Sync> SyncBackend<E> for MockBackend<E> {
    fn push(&self, items: &[E]) -> SyncResult<Option<Vec<PushAck>>> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        match self.push_acks.lock().pop_front() {
            Some(response) => response,
            // Default behavior: acknowledge the whole batch now.
            None => Ok(Some(
                items
                    .iter()
                    .map(|item| PushAck {
                        id: item.id(),
                        updated_at: Utc::now(),
                    })
                    .collect(),
            )),
        }
    }

    fn pull(&self, _since: DateTime<Utc>) -> SyncResult<Vec<E>> {
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        match self.pull_batches.lock().pop_front() {
            Some(response) => response,
            None => Ok(Vec::new()),
        }
    }
}

impl<E> MockBackend<E> {
    /// Queues a retryable transport failure for the next push.
    pub fn queue_push_failure(&self) {
        self.queue_push(Err(SyncError::transport("connection reset")));
    }

    /// Queues an auth failure for the next push.
    pub fn queue_push_auth_failure(&self) {
        self.queue_push(Err(SyncError::AuthRequired));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lango_model::{Word, WordSource};

    #[test]
    fn default_push_acks_everything() {
        let backend: MockBackend<Word> = MockBackend::new();
        let w = Word::new("sol", "sun", "es", "en", WordSource::User, Utc::now());
        let acks = backend.push(std::slice::from_ref(&w)).unwrap().unwrap();
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].id, w.id);
        assert_eq!(backend.push_calls(), 1);
    }

    #[test]
    fn queued_responses_consumed_in_order() {
        let backend: MockBackend<Word> = MockBackend::new();
        backend.queue_push(Ok(None));
        backend.queue_push_failure();

        let w = Word::new("sol", "sun", "es", "en", WordSource::User, Utc::now());
        assert!(backend.push(std::slice::from_ref(&w)).unwrap().is_none());
        assert!(backend.push(std::slice::from_ref(&w)).is_err());
        // Queue exhausted, back to default ack-all.
        assert!(backend.push(std::slice::from_ref(&w)).unwrap().is_some());
    }
}
