use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::{Evaluation, Session};
use crate::errors::InterviewError;
use crate::phase::NoteSection;

/// In-memory session registry.
///
/// Cheap to clone; clones share the same map. Nothing is persisted and there
/// is no expiry: a session lives until `delete` or process exit.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    evaluating: Arc<Mutex<HashSet<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Session>>, InterviewError> {
        self.sessions.lock().map_err(|_| InterviewError::LockPoisoned)
    }

    /// Register a new session for `question` and return a copy of it.
    pub fn create(&self, question: String) -> Result<Session, InterviewError> {
        let session = Session::new(question);
        self.lock()?
            .insert(session.id().to_string(), session.clone());
        debug!(session_id = session.id(), "session created");
        Ok(session)
    }

    /// Return the session if it exists. Never mutates.
    pub fn validate(&self, id: &str) -> Result<Session, InterviewError> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| InterviewError::not_found(id))
    }

    pub fn update_note(
        &self,
        id: &str,
        section: NoteSection,
        content: String,
    ) -> Result<Session, InterviewError> {
        self.with_session(id, |session| session.set_note(section, content))
    }

    pub fn record_evaluation(
        &self,
        id: &str,
        section: NoteSection,
        evaluation: Evaluation,
    ) -> Result<Session, InterviewError> {
        self.with_session(id, |session| session.record_evaluation(section, evaluation))
    }

    /// Remove a session. A second delete of the same id reports NotFound.
    pub fn delete(&self, id: &str) -> Result<(), InterviewError> {
        match self.lock()?.remove(id) {
            Some(_) => {
                debug!(session_id = id, "session deleted");
                Ok(())
            }
            None => Err(InterviewError::not_found(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claim the single evaluation slot for `id`. The slot is released when the
    /// returned guard drops.
    pub fn begin_evaluation(&self, id: &str) -> Result<EvaluationGuard, InterviewError> {
        let mut evaluating = self
            .evaluating
            .lock()
            .map_err(|_| InterviewError::LockPoisoned)?;
        if !evaluating.insert(id.to_string()) {
            return Err(InterviewError::EvaluationInProgress { id: id.to_string() });
        }
        Ok(EvaluationGuard {
            id: id.to_string(),
            evaluating: Arc::clone(&self.evaluating),
        })
    }

    fn with_session<F>(&self, id: &str, f: F) -> Result<Session, InterviewError>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.lock()?;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| InterviewError::not_found(id))?;
        f(session);
        Ok(session.clone())
    }
}

/// Holds a session's evaluation slot.
pub struct EvaluationGuard {
    id: String,
    evaluating: Arc<Mutex<HashSet<String>>>,
}

impl Drop for EvaluationGuard {
    fn drop(&mut self) {
        if let Ok(mut evaluating) = self.evaluating.lock() {
            evaluating.remove(&self.id);
        }
    }
}
