//! Classifier-score-ordered selection.

use super::{studyable, StrategyInput, WordSetStrategy};
use lango_model::{EntityId, SessionModel, WordSet};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Selects the studyable words the classifier considers least known:
/// `grade_three_prob` ascending, missing state scoring 0.
pub struct MlStrategy;

impl WordSetStrategy for MlStrategy {
    fn build(&self, input: &StrategyInput<'_>) -> WordSet {
        let scores: HashMap<EntityId, f64> = input
            .ml_states
            .iter()
            .map(|s| (s.word_id, s.grade_three_prob))
            .collect();
        let score = |id: EntityId| scores.get(&id).copied().unwrap_or(0.0);

        let mut candidates = studyable(input.words);
        candidates.sort_by(|a, b| {
            score(a.id)
                .partial_cmp(&score(b.id))
                .unwrap_or(Ordering::Equal)
        });
        candidates.truncate(input.size);

        WordSet {
            words: candidates,
            model: SessionModel::Ml,
            version: None,
        }
    }
}
