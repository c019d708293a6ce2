//! Ephemeral word sets produced by selection strategies.

use crate::session::SessionModel;
use crate::word::Word;

/// The words chosen for one study session.
///
/// Never persisted; ranking determines membership only, the session
/// layer re-shuffles before presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct WordSet {
    /// Selected words.
    pub words: Vec<Word>,
    /// The model that produced the selection.
    pub model: SessionModel,
    /// Version tag of the producing model, when one applies.
    pub version: Option<String>,
}

impl WordSet {
    /// An empty set attributed to `model`.
    pub fn empty(model: SessionModel) -> Self {
        Self {
            words: Vec::new(),
            model,
            version: None,
        }
    }

    /// Number of selected words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no words were selected.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `word_id` is part of this set.
    pub fn contains(&self, word_id: crate::EntityId) -> bool {
        self.words.iter().any(|w| w.id == word_id)
    }
}
