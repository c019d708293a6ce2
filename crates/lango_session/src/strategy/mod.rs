//! Word-set selection strategies.
//!
//! A strategy ranks the word universe and takes the top `size` members;
//! it decides membership, not presentation order. All strategies except
//! the heuristic restrict candidates to studyable (active, not removed)
//! words.

mod heuristic;
mod hybrid;
mod ml;
mod oldest;
mod random;

pub use heuristic::HeuristicStrategy;
pub use hybrid::HybridStrategy;
pub use ml::MlStrategy;
pub use oldest::OldestStrategy;
pub use random::RandomStrategy;

use lango_model::{
    Evaluation, SessionMode, SessionModel, Word, WordHeuristicState, WordMlState, WordSet,
};

/// Everything a strategy may consult when building a word set.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInput<'a> {
    /// Maximum number of words to select.
    pub size: usize,
    /// The full word universe, including inactive and removed words.
    pub words: &'a [Word],
    /// All evaluations.
    pub evaluations: &'a [Evaluation],
    /// Current ML states.
    pub ml_states: &'a [WordMlState],
    /// Current heuristic states.
    pub heuristic_states: &'a [WordHeuristicState],
    /// Model of the most recent session, for hybrid alternation.
    pub last_session_model: Option<SessionModel>,
}

/// A pure selection function over the word/evaluation/state universe.
pub trait WordSetStrategy: Send + Sync {
    /// Builds a word set of at most `input.size` members.
    fn build(&self, input: &StrategyInput<'_>) -> WordSet;
}

/// The studyable subset of the word universe.
pub(crate) fn studyable(words: &[Word]) -> Vec<Word> {
    words.iter().filter(|w| w.is_studyable()).cloned().collect()
}

/// Picks the strategy for a session: random and oldest modes force
/// their strategy, every other mode follows the configured session
/// model (with heuristic standing in for an unset model).
pub fn strategy_for(mode: SessionMode, configured: SessionModel) -> Box<dyn WordSetStrategy> {
    match mode {
        SessionMode::Random => Box::new(RandomStrategy),
        SessionMode::Oldest => Box::new(OldestStrategy),
        SessionMode::Study | SessionMode::Unknown => match configured {
            SessionModel::Heuristic | SessionModel::None => Box::new(HeuristicStrategy),
            SessionModel::Ml => Box::new(MlStrategy),
            SessionModel::Hybrid => Box::new(HybridStrategy),
        },
    }
}
