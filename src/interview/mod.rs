//! Interview service.
//!
//! `InterviewService` is the single entry point request handlers use. It owns
//! the session store and the two collaborators (question source, feedback
//! engine) and implements the session lifecycle:
//!
//! 1. `start` picks a question and registers a session
//! 2. `validate` / `update_note` read and edit it
//! 3. `evaluate` forwards one section to the feedback engine and merges the
//!    result, replacing any earlier evaluation of that section
//! 4. `end` deletes it
//!
//! The service does not consult the phase gate. Callers decide whether a
//! section may be evaluated; only empty content is rejected here.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::errors::{FeedbackError, InterviewError};
use crate::feedback::{Feedback, FeedbackEngine, FeedbackRequest, HintRequest};
use crate::phase::NoteSection;
use crate::questions::QuestionSource;
use crate::session::{Evaluation, SessionSnapshot, SessionStore, StartedSession};

/// Outcome of a successful evaluation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub evaluation: Evaluation,
    pub session: SessionSnapshot,
}

pub struct InterviewService {
    store: SessionStore,
    questions: Arc<dyn QuestionSource>,
    feedback: Arc<dyn FeedbackEngine>,
    feedback_timeout: Option<Duration>,
}

impl InterviewService {
    pub fn new(
        store: SessionStore,
        questions: Arc<dyn QuestionSource>,
        feedback: Arc<dyn FeedbackEngine>,
    ) -> Self {
        Self {
            store,
            questions,
            feedback,
            feedback_timeout: None,
        }
    }

    /// Bound every feedback call. Expiry is reported as an upstream failure.
    pub fn with_feedback_timeout(mut self, timeout: Duration) -> Self {
        self.feedback_timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn start(&self) -> Result<StartedSession, InterviewError> {
        let question = self.questions.random_question();
        let session = self.store.create(question)?;
        info!(session_id = session.id(), question = session.question(), "interview started");
        Ok(StartedSession::from(&session))
    }

    pub fn validate(&self, session_id: &str) -> Result<SessionSnapshot, InterviewError> {
        Ok(self.store.validate(session_id)?.snapshot())
    }

    pub fn update_note(
        &self,
        session_id: &str,
        section: NoteSection,
        content: String,
    ) -> Result<SessionSnapshot, InterviewError> {
        Ok(self
            .store
            .update_note(session_id, section, content)?
            .snapshot())
    }

    /// Evaluate `content` for `section` and merge the result into the session.
    ///
    /// On any failure the session is left exactly as it was.
    pub async fn evaluate(
        &self,
        session_id: &str,
        section: NoteSection,
        content: &str,
    ) -> Result<EvaluationOutcome, InterviewError> {
        if content.trim().is_empty() {
            return Err(InterviewError::Validation(format!(
                "{} content must not be empty",
                section.label()
            )));
        }

        let session = self.store.validate(session_id)?;
        let _slot = self.store.begin_evaluation(session_id)?;

        let request = FeedbackRequest {
            section,
            content: content.to_string(),
            question: session.question().to_string(),
        };
        let feedback = self
            .bounded(self.feedback.evaluate(&request))
            .await
            .inspect_err(|e| {
                warn!(session_id, section = section.as_str(), error = %e, "evaluation failed");
            })?;

        let Feedback { feedback, score } = feedback;
        let evaluation = Evaluation::new(section, feedback.clone(), score);
        // The session may have ended while the provider was working
        let updated = self
            .store
            .record_evaluation(session_id, section, evaluation.clone())?;

        info!(session_id, section = section.as_str(), score = ?score, "section evaluated");
        Ok(EvaluationOutcome {
            feedback,
            score,
            evaluation,
            session: updated.snapshot(),
        })
    }

    /// Ask for a nudge on `section`. Shares the evaluation slot, stores nothing.
    pub async fn hint(
        &self,
        session_id: &str,
        section: NoteSection,
    ) -> Result<String, InterviewError> {
        let session = self.store.validate(session_id)?;
        let _slot = self.store.begin_evaluation(session_id)?;

        let request = HintRequest {
            section,
            question: session.question().to_string(),
        };
        let hint = self
            .bounded(self.feedback.hint(&request))
            .await
            .inspect_err(|e| {
                warn!(session_id, section = section.as_str(), error = %e, "hint failed");
            })?;
        Ok(hint)
    }

    pub fn end(&self, session_id: &str) -> Result<(), InterviewError> {
        self.store.delete(session_id)?;
        info!(session_id, "interview ended");
        Ok(())
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, FeedbackError>
    where
        F: std::future::Future<Output = Result<T, FeedbackError>>,
    {
        match self.feedback_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| FeedbackError::Timeout(limit.as_secs()))?,
            None => call.await,
        }
    }
}
