//! Due-date-ordered selection.

use super::{StrategyInput, WordSetStrategy};
use lango_model::{EntityId, SessionModel, Word, WordSet};
use std::collections::HashMap;

/// Selects the words most overdue for review, by `next_review`
/// ascending over the heuristic states.
///
/// Selection runs purely over state ordering: unlike every other
/// strategy this one does not filter on `active`/`removed`, matching
/// the shipped behavior.
pub struct HeuristicStrategy;

impl WordSetStrategy for HeuristicStrategy {
    fn build(&self, input: &StrategyInput<'_>) -> WordSet {
        let by_id: HashMap<EntityId, &Word> = input.words.iter().map(|w| (w.id, w)).collect();

        let mut states: Vec<_> = input.heuristic_states.iter().collect();
        states.sort_by_key(|s| s.next_review);

        let words: Vec<Word> = states
            .iter()
            .take(input.size)
            .filter_map(|s| by_id.get(&s.word_id).map(|w| (*w).clone()))
            .collect();

        WordSet {
            words,
            model: SessionModel::Heuristic,
            version: None,
        }
    }
}
