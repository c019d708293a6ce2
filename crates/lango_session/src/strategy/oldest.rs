//! Least-recently-evaluated selection.

use super::{studyable, StrategyInput, WordSetStrategy};
use chrono::{DateTime, Utc};
use lango_model::{EntityId, SessionModel, WordSet};
use std::collections::HashMap;

/// Selects the studyable words whose most recent evaluation is oldest;
/// never-evaluated words sort first.
pub struct OldestStrategy;

impl WordSetStrategy for OldestStrategy {
    fn build(&self, input: &StrategyInput<'_>) -> WordSet {
        let mut latest: HashMap<EntityId, DateTime<Utc>> = HashMap::new();
        for evaluation in input.evaluations {
            latest
                .entry(evaluation.word_id)
                .and_modify(|date| *date = (*date).max(evaluation.date))
                .or_insert(evaluation.date);
        }

        let mut candidates = studyable(input.words);
        candidates.sort_by_key(|w| latest.get(&w.id).copied().unwrap_or(DateTime::UNIX_EPOCH));
        candidates.truncate(input.size);

        WordSet {
            words: candidates,
            model: SessionModel::None,
            version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn never_evaluated_words_come_first() {
        let fresh = word("fresh");
        let stale = word("stale");
        let recent = word("recent");
        let words = vec![recent.clone(), stale.clone(), fresh.clone()];
        let evaluations = vec![eval_at(stale.id, 24 * 30), eval_at(recent.id, 2)];

        let mut input = input(2, &words);
        input.evaluations = &evaluations;
        let set = OldestStrategy.build(&input);

        let ids: Vec<_> = set.words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![fresh.id, stale.id]);
        assert_eq!(set.model, SessionModel::None);
    }

    #[test]
    fn uses_the_most_recent_evaluation_per_word() {
        let a = word("a");
        let b = word("b");
        let words = vec![a.clone(), b.clone()];
        // Word A has an old evaluation but also a recent one.
        let evaluations = vec![
            eval_at(a.id, 24 * 60),
            eval_at(a.id, 1),
            eval_at(b.id, 24 * 7),
        ];

        let mut input = input(1, &words);
        input.evaluations = &evaluations;
        let set = OldestStrategy.build(&input);
        assert_eq!(set.words[0].id, b.id);
    }
}
