//! Feature engineering over evaluation history.

use crate::classifier::Classifier;
use crate::error::StateResult;
use crate::repository::StateRepository;
use chrono::{DateTime, Utc};
use lango_model::{EntityId, Evaluation, Grade, Word, WordMlState};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Seconds per hour, as a float divisor.
const HOUR_SECS: f64 = 3600.0;

/// The classifier-facing features for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    /// Hours since the latest evaluation, or since the word was added.
    pub hours_since_last_repetition: f64,
    /// Signed hour span of the trailing learned/unlearned streak.
    pub study_duration: f64,
    /// Signed length of the trailing streak.
    pub study_streak: i32,
    /// Mean of the last 5 grades.
    pub grades_average: f64,
    /// Total evaluation count.
    pub repetitions_count: u32,
    /// Mean of consecutive grade differences over the last 5 grades.
    pub grades_trend: f64,
}

impl Features {
    /// The vector handed to the classifier, in its expected order.
    pub fn to_vector(&self) -> [f64; 6] {
        [
            self.hours_since_last_repetition,
            self.study_duration,
            self.grades_average,
            f64::from(self.repetitions_count),
            f64::from(self.study_streak),
            self.grades_trend,
        ]
    }
}

/// Signed length and hour span of the trailing streak: a run of grade-3
/// evaluations counts as learned (+), a run of grade-1/2 as unlearned
/// (-). The span is 0 for runs of a single evaluation.
fn trailing_streak(history: &[Evaluation]) -> (i32, f64) {
    let Some(last) = history.last() else {
        return (0, 0.0);
    };
    let learned = last.grade == Grade::Good;
    let run_len = history
        .iter()
        .rev()
        .take_while(|e| (e.grade == Grade::Good) == learned)
        .count();

    let sign: f64 = if learned { 1.0 } else { -1.0 };
    let streak = run_len as i32 * if learned { 1 } else { -1 };
    if run_len <= 1 {
        return (streak, 0.0);
    }

    let run_start = &history[history.len() - run_len];
    let span_hours = (last.date - run_start.date).num_seconds() as f64 / HOUR_SECS;
    (streak, sign * span_hours)
}

/// Computes the feature set for one word from its chronological
/// evaluation history.
pub fn compute_features(word: &Word, history: &[Evaluation], now: DateTime<Utc>) -> Features {
    let last_five: Vec<f64> = history
        .iter()
        .rev()
        .take(5)
        .rev()
        .map(|e| e.grade.as_f64())
        .collect();

    let grades_average = if last_five.is_empty() {
        0.0
    } else {
        last_five.iter().sum::<f64>() / last_five.len() as f64
    };

    let grades_trend = if last_five.len() < 2 {
        0.0
    } else {
        let diffs: Vec<f64> = last_five.windows(2).map(|w| w[1] - w[0]).collect();
        diffs.iter().sum::<f64>() / diffs.len() as f64
    };

    let (study_streak, study_duration) = trailing_streak(history);

    let reference = history.last().map(|e| e.date).unwrap_or(word.add_date);
    let hours_since_last_repetition = (now - reference).num_seconds() as f64 / HOUR_SECS;

    Features {
        hours_since_last_repetition,
        study_duration,
        study_streak,
        grades_average,
        repetitions_count: history.len() as u32,
        grades_trend,
    }
}

/// Holds the ML state for every word, recomputing lazily and re-scoring
/// through the external classifier.
pub struct MlEngine {
    states: RwLock<HashMap<EntityId, WordMlState>>,
    repository: Arc<dyn StateRepository<WordMlState>>,
    classifier: Arc<dyn Classifier>,
}

impl MlEngine {
    /// Creates an engine over the given repository and classifier.
    pub fn new(
        repository: Arc<dyn StateRepository<WordMlState>>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            repository,
            classifier,
        }
    }

    /// Loads persisted states into memory.
    pub fn load(&self) -> StateResult<()> {
        self.repository.create_tables()?;
        let mut states = self.states.write();
        states.clear();
        for state in self.repository.get_all()? {
            states.insert(state.word_id, state);
        }
        Ok(())
    }

    /// Snapshot of all states.
    pub fn states(&self) -> Vec<WordMlState> {
        self.states.read().values().cloned().collect()
    }

    /// One word's state, if it has been computed.
    pub fn state_for(&self, word_id: EntityId) -> Option<WordMlState> {
        self.states.read().get(&word_id).cloned()
    }

    /// Recomputes the state of every word whose evaluation count no
    /// longer matches its `repetitions_count`.
    pub fn refresh(
        &self,
        words: &[Word],
        evaluations: &[Evaluation],
        now: DateTime<Utc>,
    ) -> StateResult<()> {
        self.recompute(words, evaluations, now, false)
    }

    /// Recomputes every word's state regardless of the dirty check.
    /// Called on app foreground/load: elapsed time alone changes
    /// `hours_since_last_repetition` and therefore the score.
    pub fn refresh_clock(
        &self,
        words: &[Word],
        evaluations: &[Evaluation],
        now: DateTime<Utc>,
    ) -> StateResult<()> {
        self.recompute(words, evaluations, now, true)
    }

    fn recompute(
        &self,
        words: &[Word],
        evaluations: &[Evaluation],
        now: DateTime<Utc>,
        force: bool,
    ) -> StateResult<()> {
        let mut by_word: HashMap<EntityId, Vec<Evaluation>> = HashMap::new();
        for evaluation in evaluations {
            by_word
                .entry(evaluation.word_id)
                .or_default()
                .push(evaluation.clone());
        }
        for history in by_word.values_mut() {
            history.sort_by_key(|e| e.date);
        }

        let mut recomputed = Vec::new();
        {
            let states = self.states.read();
            for word in words {
                let history = by_word.get(&word.id).map(Vec::as_slice).unwrap_or(&[]);
                let live_count = history.len() as u32;
                let is_current = states
                    .get(&word.id)
                    .is_some_and(|s| s.repetitions_count == live_count);
                if is_current && !force {
                    continue;
                }

                let features = compute_features(word, history, now);
                let probabilities = match self.classifier.score(&features.to_vector()) {
                    Ok(p) => p,
                    Err(err) => {
                        // Keep the previous, stale-but-valid state.
                        warn!(word_id = %word.id, error = %err, "classifier failed, state retained");
                        continue;
                    }
                };

                recomputed.push(state_from(word.id, &features, probabilities));
            }
        }

        if recomputed.is_empty() {
            return Ok(());
        }

        self.repository.save(&recomputed)?;
        debug!(count = recomputed.len(), "ml states refreshed");
        let mut states = self.states.write();
        for state in recomputed {
            states.insert(state.word_id, state);
        }
        Ok(())
    }
}

fn state_from(word_id: EntityId, features: &Features, probabilities: [f64; 3]) -> WordMlState {
    let predicted_grade = probabilities
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i as u8 + 1)
        .unwrap_or(1);

    WordMlState {
        word_id,
        hours_since_last_repetition: features.hours_since_last_repetition,
        study_duration: features.study_duration,
        study_streak: features.study_streak,
        grades_average: features.grades_average,
        repetitions_count: features.repetitions_count,
        grades_trend: features.grades_trend,
        predicted_grade,
        grade_three_prob: probabilities[2],
    }
}
