//! Sync metadata carried by every persisted entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for all synced entities.
pub type EntityId = Uuid;

/// Server-synchronization bookkeeping embedded in every persisted entity.
///
/// # Invariants
///
/// - `synced == true` implies `updated_at.is_some()`
/// - `locally_updated_at` is refreshed on every local mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMeta {
    /// Whether the server has acknowledged the latest local mutation.
    pub synced: bool,
    /// Server-confirmed modification time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Time of the latest local mutation.
    pub locally_updated_at: DateTime<Utc>,
}

impl SyncMeta {
    /// Metadata for a freshly created, not-yet-pushed entity.
    pub fn local(now: DateTime<Utc>) -> Self {
        Self {
            synced: false,
            updated_at: None,
            locally_updated_at: now,
        }
    }

    /// Metadata for a record as received from the server.
    pub fn remote(updated_at: DateTime<Utc>) -> Self {
        Self {
            synced: true,
            updated_at: Some(updated_at),
            locally_updated_at: updated_at,
        }
    }

    /// The timestamp used when computing pull deltas: server-confirmed
    /// time when available, local mutation time otherwise.
    pub fn effective_updated_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.locally_updated_at)
    }
}

/// Access to the sync metadata embedded in an entity.
///
/// Implemented by every synced entity kind; the generic sync engine is
/// written against this trait alone.
pub trait Tracked: Clone {
    /// Stable entity id, immutable for the entity's lifetime.
    fn id(&self) -> EntityId;

    /// Shared sync metadata.
    fn meta(&self) -> &SyncMeta;

    /// Mutable sync metadata.
    fn meta_mut(&mut self) -> &mut SyncMeta;

    /// True once the server has acknowledged the latest mutation.
    fn synced(&self) -> bool {
        self.meta().synced
    }

    /// Records a local mutation: clears `synced` and bumps
    /// `locally_updated_at`.
    fn mark_local_change(&mut self, now: DateTime<Utc>) {
        let meta = self.meta_mut();
        meta.synced = false;
        meta.locally_updated_at = now;
    }

    /// Records a server acknowledgement with the server-assigned
    /// modification time.
    fn mark_synced(&mut self, updated_at: DateTime<Utc>) {
        let meta = self.meta_mut();
        meta.synced = true;
        meta.updated_at = Some(updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn local_meta_starts_unsynced() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let meta = SyncMeta::local(now);
        assert!(!meta.synced);
        assert!(meta.updated_at.is_none());
        assert_eq!(meta.effective_updated_at(), now);
    }

    #[test]
    fn remote_meta_is_synced() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let meta = SyncMeta::remote(at);
        assert!(meta.synced);
        assert_eq!(meta.updated_at, Some(at));
        assert_eq!(meta.effective_updated_at(), at);
    }

    #[test]
    fn effective_updated_at_prefers_server_time() {
        let local = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let server = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let meta = SyncMeta {
            synced: true,
            updated_at: Some(server),
            locally_updated_at: local,
        };
        assert_eq!(meta.effective_updated_at(), server);
    }
}
