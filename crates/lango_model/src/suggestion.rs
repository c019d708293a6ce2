//! Server-suggested words.

use crate::meta::{EntityId, SyncMeta, Tracked};
use serde::{Deserialize, Serialize};

/// A word the server proposes the user add to their vocabulary.
///
/// Lifecycle: created server-side, mutated locally (`display_count`
/// bumps, `skipped`/`added` flags), and deleted locally once a synced
/// suggestion reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable id, assigned by the server.
    pub id: EntityId,
    /// Owning user.
    pub user_id: EntityId,
    /// Suggested word.
    pub word: String,
    /// Its translation.
    pub translation: String,
    /// Language code of `word`.
    pub main_lang: String,
    /// Language code of `translation`.
    pub translation_lang: String,
    /// How many times the suggestion has been shown.
    pub display_count: u32,
    /// User dismissed the suggestion.
    pub skipped: bool,
    /// User accepted the suggestion into their vocabulary.
    pub added: bool,
    /// Sync bookkeeping.
    #[serde(flatten)]
    pub meta: SyncMeta,
}

impl Suggestion {
    /// True once the user has dealt with the suggestion either way.
    pub fn is_terminal(&self) -> bool {
        self.skipped || self.added
    }
}

impl Tracked for Suggestion {
    fn id(&self) -> EntityId {
        self.id
    }

    fn meta(&self) -> &SyncMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut SyncMeta {
        &mut self.meta
    }
}
