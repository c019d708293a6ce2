//! Session lifecycle: word-set construction, grade accumulation, and
//! record emission.

use crate::error::SessionResult;
use crate::strategy::{strategy_for, StrategyInput};
use chrono::Utc;
use lango_model::{
    EntityId, Evaluation, Grade, Session, SessionMode, SessionModel, WordSet,
};
use lango_state::{HeuristicEngine, MlEngine};
use lango_store::{EvaluationStore, SessionStore, WordStore};
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The strategy receives ten candidate slots per requested card.
const WORDS_PER_CARD: usize = 10;

/// Per-account session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Language being studied.
    pub main_lang: String,
    /// The user's own language.
    pub translation_lang: String,
    /// Model driving selection in study mode.
    pub session_model: SessionModel,
}

struct ActiveSession {
    word_set: WordSet,
    grades: HashMap<EntityId, Grade>,
    mode: SessionMode,
}

/// Drives one study session at a time over the entity stores and
/// derived-state engines.
///
/// A session and its evaluations are not one transaction: each record
/// stream persists and syncs on its own, and the sync engines reconcile
/// them independently after a crash between the two.
pub struct SessionOrchestrator {
    words: Arc<WordStore>,
    sessions: Arc<SessionStore>,
    evaluations: Arc<EvaluationStore>,
    heuristic: Arc<HeuristicEngine>,
    ml: Arc<MlEngine>,
    config: SessionConfig,
    active: RwLock<Option<ActiveSession>>,
}

impl SessionOrchestrator {
    /// Creates an orchestrator over the given stores and engines.
    pub fn new(
        words: Arc<WordStore>,
        sessions: Arc<SessionStore>,
        evaluations: Arc<EvaluationStore>,
        heuristic: Arc<HeuristicEngine>,
        ml: Arc<MlEngine>,
        config: SessionConfig,
    ) -> Self {
        Self {
            words,
            sessions,
            evaluations,
            heuristic,
            ml,
            config,
            active: RwLock::new(None),
        }
    }

    /// Starts a session of `length` cards: refreshes derived state,
    /// runs the strategy for the mode with `size = length * 10`, and
    /// re-shuffles the selection for presentation. Any session still
    /// active is discarded unrecorded.
    pub fn start_session(&self, length: usize, mode: SessionMode) -> SessionResult<WordSet> {
        let now = Utc::now();
        let words = self.words.all();
        let evaluations = self.evaluations.all();
        self.heuristic.refresh(&words, &evaluations, now)?;
        self.ml.refresh(&words, &evaluations, now)?;

        let ml_states = self.ml.states();
        let heuristic_states = self.heuristic.states();
        let input = StrategyInput {
            size: length * WORDS_PER_CARD,
            words: &words,
            evaluations: &evaluations,
            ml_states: &ml_states,
            heuristic_states: &heuristic_states,
            last_session_model: self.sessions.last_session_model(),
        };

        let strategy = strategy_for(mode, self.config.session_model);
        let mut word_set = strategy.build(&input);
        // Ranking chose membership; presentation order is random.
        word_set.words.shuffle(&mut thread_rng());

        debug!(
            count = word_set.len(),
            model = ?word_set.model,
            "session started"
        );
        *self.active.write() = Some(ActiveSession {
            word_set: word_set.clone(),
            grades: HashMap::new(),
            mode,
        });
        Ok(word_set)
    }

    /// Records a grade for one card. Revisiting a card overwrites its
    /// previous grade. Without an active session, or for a word outside
    /// the set, this is a no-op.
    pub fn record_grade(&self, word_id: EntityId, grade: Grade) {
        let mut active = self.active.write();
        match active.as_mut() {
            Some(session) if session.word_set.contains(word_id) => {
                session.grades.insert(word_id, grade);
            }
            _ => debug!(word_id = %word_id, "grade outside an active session ignored"),
        }
    }

    /// Closes the session after the last card was graded.
    pub fn finish_session(&self) -> SessionResult<Option<Session>> {
        self.close(true)
    }

    /// Closes the session on an early exit.
    pub fn exit_session(&self) -> SessionResult<Option<Session>> {
        self.close(false)
    }

    fn close(&self, finished: bool) -> SessionResult<Option<Session>> {
        let Some(active) = self.active.write().take() else {
            return Ok(None);
        };
        if active.grades.is_empty() {
            debug!("session closed without grades, nothing recorded");
            return Ok(None);
        }

        let now = Utc::now();
        let graded = active.grades.len() as f64;
        let average_score = active.grades.values().map(|g| g.as_f64()).sum::<f64>() / graded;

        let session = Session::new(
            now,
            self.config.main_lang.clone(),
            self.config.translation_lang.clone(),
            active.mode,
            active.word_set.model,
            average_score,
            active.word_set.len() as u32,
            finished,
        );
        self.sessions.add_session(session.clone())?;

        let batch: Vec<Evaluation> = active
            .grades
            .iter()
            .map(|(&word_id, &grade)| Evaluation::new(word_id, session.id, grade, now))
            .collect();
        self.evaluations.add_evaluations(batch)?;

        // New evaluations dirty the derived state for the graded words.
        let words = self.words.all();
        let evaluations = self.evaluations.all();
        self.heuristic.refresh(&words, &evaluations, now)?;
        self.ml.refresh(&words, &evaluations, now)?;

        // Each stream enters sync on its own; failures leave the records
        // unsynced for the next trigger.
        self.sessions.sync()?;
        self.evaluations.sync()?;

        Ok(Some(session))
    }
}
