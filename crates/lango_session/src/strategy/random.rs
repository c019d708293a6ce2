//! Uniform random selection.

use super::{studyable, StrategyInput, WordSetStrategy};
use lango_model::{SessionModel, WordSet};
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Selects a uniform random subset of the studyable words.
pub struct RandomStrategy;

impl WordSetStrategy for RandomStrategy {
    fn build(&self, input: &StrategyInput<'_>) -> WordSet {
        let mut candidates = studyable(input.words);
        candidates.shuffle(&mut thread_rng());
        candidates.truncate(input.size);

        WordSet {
            words: candidates,
            model: SessionModel::None,
            version: None,
        }
    }
}
