//! Study sessions.

use crate::meta::{EntityId, SyncMeta, Tracked};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the user asked for the session's words to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionMode {
    /// Selection driven by the account's configured session model.
    Study,
    /// Uniform random selection.
    Random,
    /// Least-recently-evaluated first.
    Oldest,
    /// Mode not recorded (legacy records).
    Unknown,
}

/// Which ranking model produced a session's word set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionModel {
    /// SM-2-style spaced-repetition ordering.
    Heuristic,
    /// Classifier-score ordering.
    Ml,
    /// Alternating heuristic/ML.
    Hybrid,
    /// No model involved (random/oldest selection).
    None,
}

/// One study session record.
///
/// Created exactly once per session, including sessions the user exits
/// early (then `finished == false`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Stable id.
    pub id: EntityId,
    /// When the session ended.
    pub date: DateTime<Utc>,
    /// The user-local calendar day, `YYYY-MM-DD`.
    pub local_day: String,
    /// Language code studied.
    pub main_lang: String,
    /// Translation language code.
    pub translation_lang: String,
    /// How words were selected.
    pub mode: SessionMode,
    /// Which model produced the word set.
    pub session_model: SessionModel,
    /// Mean of the grades recorded in this session.
    pub average_score: f64,
    /// Size of the word set presented, not the number of cards graded.
    pub words_count: u32,
    /// True only when the user graded the final card.
    pub finished: bool,
    /// Sync bookkeeping.
    #[serde(flatten)]
    pub meta: SyncMeta,
}

impl Session {
    /// Creates a new unsynced session record ending at `date`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: DateTime<Utc>,
        main_lang: impl Into<String>,
        translation_lang: impl Into<String>,
        mode: SessionMode,
        session_model: SessionModel,
        average_score: f64,
        words_count: u32,
        finished: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            local_day: date.format("%Y-%m-%d").to_string(),
            main_lang: main_lang.into(),
            translation_lang: translation_lang.into(),
            mode,
            session_model,
            average_score,
            words_count,
            finished,
            meta: SyncMeta::local(date),
        }
    }
}

impl Tracked for Session {
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
