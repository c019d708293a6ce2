//! Alternating heuristic/ML selection.

use super::{HeuristicStrategy, MlStrategy, StrategyInput, WordSetStrategy};
use lango_model::{SessionModel, WordSet};

/// Alternates between the two models: delegates to ML when the previous
/// session used the heuristic, and to the heuristic otherwise
/// (including the first session). The returned set reports the
/// delegate's model so the next session flips back.
pub struct HybridStrategy;

impl WordSetStrategy for HybridStrategy {
    fn build(&self, input: &StrategyInput<'_>) -> WordSet {
        if input.last_session_model == Some(SessionModel::Heuristic) {
            MlStrategy.build(input)
        } else {
            HeuristicStrategy.build(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn first_session_uses_the_heuristic() {
        let words = vec![word("uno")];
        let set = HybridStrategy.build(&input(5, &words));
        assert_eq!(set.model, SessionModel::Heuristic);
    }

    #[test]
    fn flips_to_ml_after_a_heuristic_session() {
        let words = vec![word("uno")];
        let mut input = input(5, &words);
        input.last_session_model = Some(SessionModel::Heuristic);
        let set = HybridStrategy.build(&input);
        assert_eq!(set.model, SessionModel::Ml);
    }

    #[test]
    fn flips_back_after_an_ml_session() {
        let words = vec![word("uno")];
        let mut input = input(5, &words);
        input.last_session_model = Some(SessionModel::Ml);
        let set = HybridStrategy.build(&input);
        assert_eq!(set.model, SessionModel::Heuristic);
    }
}
