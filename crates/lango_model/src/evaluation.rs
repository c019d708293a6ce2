//! Per-card evaluations and recall grades.

use crate::meta::{EntityId, SyncMeta, Tracked};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Raised when a numeric grade is outside `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid grade {0}, expected 1..=3")]
pub struct InvalidGrade(pub u8);

/// User self-rating of recall quality for one card.
///
/// Serialized as its numeric value, 1 (bad) through 3 (good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Grade {
    /// Did not recall the word.
    Bad,
    /// Recalled with difficulty.
    Fair,
    /// Recalled easily.
    Good,
}

impl Grade {
    /// Numeric value, 1 through 3.
    pub fn value(self) -> u8 {
        match self {
            Grade::Bad => 1,
            Grade::Fair => 2,
            Grade::Good => 3,
        }
    }

    /// Numeric value as a float, for averaging and feature vectors.
    pub fn as_f64(self) -> f64 {
        f64::from(self.value())
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

impl TryFrom<u8> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Grade::Bad),
            2 => Ok(Grade::Fair),
            3 => Ok(Grade::Good),
            other => Err(InvalidGrade(other)),
        }
    }
}

/// One graded card within one study session.
///
/// A word accumulates evaluations over time; the derived-state engines
/// replay them in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Stable id.
    pub id: EntityId,
    /// The word that was graded.
    pub word_id: EntityId,
    /// The session the grade was recorded in.
    pub session_id: EntityId,
    /// Recall grade.
    pub grade: Grade,
    /// When the card was graded.
    pub date: DateTime<Utc>,
    /// Sync bookkeeping.
    #[serde(flatten)]
    pub meta: SyncMeta,
}

impl Evaluation {
    /// Creates a new unsynced evaluation.
    pub fn new(word_id: EntityId, session_id: EntityId, grade: Grade, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            word_id,
            session_id,
            grade,
            date,
            meta: SyncMeta::local(date),
        }
    }
}

impl Tracked for Evaluation {
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
