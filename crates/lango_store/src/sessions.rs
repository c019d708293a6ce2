//! The session store.

use crate::error::{StoreError, StoreResult};
use lango_model::{Session, SessionModel};
use lango_sync::{Repository, SyncBackend, SyncConfig, SyncEngine, SyncError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// In-memory source of truth for study session records.
pub struct SessionStore {
    sessions: RwLock<Vec<Session>>,
    repository: Arc<dyn Repository<Session>>,
    engine: SyncEngine<Session>,
}

impl SessionStore {
    /// Creates a store over the given transport and repository.
    pub fn new(
        backend: Arc<dyn SyncBackend<Session>>,
        repository: Arc<dyn Repository<Session>>,
        config: SyncConfig,
    ) -> Self {
        Self {
            sessions: RwLock::new(Vec::new()),
            engine: SyncEngine::new(backend, repository.clone(), config),
            repository,
        }
    }

    /// Loads persisted sessions into memory.
    pub fn load(&self) -> StoreResult<()> {
        self.repository.create_tables()?;
        *self.sessions.write() = self.repository.get_all()?;
        Ok(())
    }

    /// Snapshot of all sessions.
    pub fn all(&self) -> Vec<Session> {
        self.sessions.read().clone()
    }

    /// Records a finished or abandoned session.
    pub fn add_session(&self, session: Session) -> StoreResult<()> {
        self.repository.update(&session)?;
        self.sessions.write().push(session);
        Ok(())
    }

    /// The model of the most recently recorded session, used by the
    /// hybrid strategy's alternation.
    pub fn last_session_model(&self) -> Option<SessionModel> {
        self.sessions
            .read()
            .iter()
            .max_by_key(|s| s.date)
            .map(|s| s.session_model)
    }

    /// Triggers one sync cycle. Transport failures are swallowed; only
    /// auth failures surface.
    pub fn sync(&self) -> StoreResult<()> {
        let snapshot = self.all();
        match self.engine.sync(&snapshot) {
            Ok(outcome) => {
                if !outcome.skipped {
                    *self.sessions.write() = outcome.merged;
                }
                Ok(())
            }
            Err(SyncError::AuthRequired) => Err(StoreError::AuthRequired),
            Err(err) => {
                warn!(error = %err, "session sync failed, will retry on next trigger");
                Ok(())
            }
        }
    }
}
