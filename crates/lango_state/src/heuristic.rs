//! SM-2-style spaced-repetition state.

use crate::error::StateResult;
use crate::repository::StateRepository;
use chrono::{DateTime, Duration, Utc};
use lango_model::{
    EntityId, Evaluation, Grade, Word, WordHeuristicState, MAX_EASE_FACTOR, MIN_EASE_FACTOR,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Applies one evaluation to the scheduling state.
///
/// The interval for deep repetitions uses the easiness factor as it
/// stood before this evaluation's adjustment.
fn apply_evaluation(state: &mut WordHeuristicState, evaluation: &Evaluation) {
    match evaluation.grade {
        Grade::Bad => {
            state.study_count = 0;
            state.interval_days = 1;
        }
        Grade::Fair | Grade::Good => {
            state.study_count += 1;
            state.interval_days = match state.study_count {
                1 => 1,
                2 => 3,
                3 => 6,
                _ => (f64::from(state.interval_days) * state.ease_factor).round() as u32,
            };
        }
    }

    state.ease_factor = match evaluation.grade {
        Grade::Good => (state.ease_factor + 0.1).min(MAX_EASE_FACTOR),
        grade => {
            let miss = f64::from(3 - grade.value());
            (state.ease_factor - miss * (0.08 + miss * 0.02)).max(MIN_EASE_FACTOR)
        }
    };

    state.last_review = evaluation.date;
    state.next_review = evaluation.date + Duration::days(i64::from(state.interval_days));
    state.repetitions_count += 1;
}

/// Rebuilds a word's scheduling state by replaying its evaluations in
/// chronological order. `now` only matters for words with no
/// evaluations, which are due immediately.
pub fn replay_history(
    word_id: EntityId,
    evaluations: &[Evaluation],
    now: DateTime<Utc>,
) -> WordHeuristicState {
    let mut state = WordHeuristicState::initial(word_id, now);
    let mut history: Vec<&Evaluation> = evaluations.iter().collect();
    history.sort_by_key(|e| e.date);
    for evaluation in history {
        apply_evaluation(&mut state, evaluation);
    }
    state
}

/// Holds the heuristic state for every word, recomputing lazily.
pub struct HeuristicEngine {
    states: RwLock<HashMap<EntityId, WordHeuristicState>>,
    repository: Arc<dyn StateRepository<WordHeuristicState>>,
}

impl HeuristicEngine {
    /// Creates an engine over the given repository.
    pub fn new(repository: Arc<dyn StateRepository<WordHeuristicState>>) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            repository,
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
    pub fn states(&self) -> Vec<WordHeuristicState> {
        self.states.read().values().cloned().collect()
    }

    /// One word's state, if it has been computed.
    pub fn state_for(&self, word_id: EntityId) -> Option<WordHeuristicState> {
        self.states.read().get(&word_id).cloned()
    }

    /// Recomputes the state of every word whose evaluation count no
    /// longer matches its `repetitions_count`, including words with no
    /// state yet. Replaying an unchanged history yields bit-identical
    /// state, so redundant triggers are harmless.
    pub fn refresh(
        &self,
        words: &[Word],
        evaluations: &[Evaluation],
        now: DateTime<Utc>,
    ) -> StateResult<()> {
        let mut by_word: HashMap<EntityId, Vec<Evaluation>> = HashMap::new();
        for evaluation in evaluations {
            by_word
                .entry(evaluation.word_id)
                .or_default()
                .push(evaluation.clone());
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
                if is_current {
                    continue;
                }
                recomputed.push(replay_history(word.id, history, now));
            }
        }

        if recomputed.is_empty() {
            return Ok(());
        }

        self.repository.save(&recomputed)?;
        debug!(count = recomputed.len(), "heuristic states refreshed");
        let mut states = self.states.write();
        for state in recomputed {
            states.insert(state.word_id, state);
        }
        Ok(())
    }
}
