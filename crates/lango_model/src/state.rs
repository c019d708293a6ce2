//! Derived per-word study state.
//!
//! Both state kinds are 1:1 with a word, persisted locally, and rebuilt
//! from the word's evaluation history — never hand-edited. The
//! `repetitions_count` field doubles as the dirty-check key: a state is
//! stale whenever it differs from the live evaluation count.

use crate::meta::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of the SM-2 easiness factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Upper bound of the SM-2 easiness factor.
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Spaced-repetition scheduling state for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordHeuristicState {
    /// The word this state belongs to.
    pub word_id: EntityId,
    /// Current review interval in days.
    pub interval_days: u32,
    /// Total evaluations replayed into this state.
    pub repetitions_count: u32,
    /// Consecutive successful (grade 2 or 3) reviews; reset by grade 1.
    pub study_count: u32,
    /// Date of the most recent evaluation.
    pub last_review: DateTime<Utc>,
    /// When the word is next due.
    pub next_review: DateTime<Utc>,
    /// SM-2 easiness factor, kept within `[1.3, 2.5]`.
    pub ease_factor: f64,
}

impl WordHeuristicState {
    /// State for a word with no evaluations yet: due immediately.
    pub fn initial(word_id: EntityId, now: DateTime<Utc>) -> Self {
        Self {
            word_id,
            interval_days: 1,
            repetitions_count: 0,
            study_count: 0,
            last_review: now,
            next_review: now,
            ease_factor: MAX_EASE_FACTOR,
        }
    }
}

/// Classifier-facing feature state for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMlState {
    /// The word this state belongs to.
    pub word_id: EntityId,
    /// Hours elapsed since the latest evaluation (or since the word was
    /// added, if never evaluated).
    pub hours_since_last_repetition: f64,
    /// Hour span of the trailing learned/unlearned streak; negative for
    /// an unlearned streak, 0 when the streak has a single evaluation.
    pub study_duration: f64,
    /// Signed length of the trailing streak: +N consecutive grade-3
    /// evaluations, -N consecutive grade-1/2 evaluations.
    pub study_streak: i32,
    /// Mean of the last 5 grades, 0 with no evaluations.
    pub grades_average: f64,
    /// Total evaluation count.
    pub repetitions_count: u32,
    /// Mean of consecutive grade differences over the last 5 grades,
    /// 0 with fewer than 2.
    pub grades_trend: f64,
    /// Classifier's argmax grade, 1 through 3.
    pub predicted_grade: u8,
    /// Classifier's probability of a grade-3 recall, in `[0, 1]`.
    pub grade_three_prob: f64,
}

impl WordMlState {
    /// Zeroed state for a word with no evaluations and no score yet.
    pub fn initial(word_id: EntityId) -> Self {
        Self {
            word_id,
            hours_since_last_repetition: 0.0,
            study_duration: 0.0,
            study_streak: 0,
            grades_average: 0.0,
            repetitions_count: 0,
            grades_trend: 0.0,
            predicted_grade: 1,
            grade_three_prob: 0.0,
        }
    }
}
