//! Vocabulary words.

use crate::meta::{EntityId, SyncMeta, Tracked};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a word entered the user's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSource {
    /// Added manually by the user.
    User,
    /// Accepted from a server-side suggestion.
    Lango,
}

/// A vocabulary word with its translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Stable id, immutable once assigned.
    pub id: EntityId,
    /// The word in the language being studied.
    pub text: String,
    /// Its translation in the user's language.
    pub translation: String,
    /// Language code of `text`.
    pub main_lang: String,
    /// Language code of `translation`.
    pub translation_lang: String,
    /// How the word was added.
    pub source: WordSource,
    /// When the word entered the vocabulary.
    pub add_date: DateTime<Utc>,
    /// Whether the word participates in study selection.
    pub active: bool,
    /// Soft-delete flag; removed words are kept for sync and dedup.
    pub removed: bool,
    /// Sync bookkeeping.
    #[serde(flatten)]
    pub meta: SyncMeta,
}

impl Word {
    /// Creates a new active, unsynced word.
    pub fn new(
        text: impl Into<String>,
        translation: impl Into<String>,
        main_lang: impl Into<String>,
        translation_lang: impl Into<String>,
        source: WordSource,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            translation: translation.into(),
            main_lang: main_lang.into(),
            translation_lang: translation_lang.into(),
            source,
            add_date: now,
            active: true,
            removed: false,
            meta: SyncMeta::local(now),
        }
    }

    /// True when the word is eligible for study selection.
    pub fn is_studyable(&self) -> bool {
        self.active && !self.removed
    }

    /// Whether this word represents the same (text, translation) entry,
    /// ignoring case and surrounding whitespace. Used by the add-word
    /// dedup rule.
    pub fn matches_entry(&self, text: &str, translation: &str) -> bool {
        fn norm(s: &str) -> String {
            s.trim().to_lowercase()
        }
        norm(&self.text) == norm(text) && norm(&self.translation) == norm(translation)
    }
}

impl Tracked for Word {
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
