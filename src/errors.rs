//! Typed error hierarchy for the interview companion.
//!
//! Two enums cover the two failure surfaces:
//! - `InterviewError`: session store and interview service failures
//! - `FeedbackError`: failures talking to the language-model provider

use thiserror::Error;

/// Errors from the session store and the interview service.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Session {id} not found")]
    SessionNotFound { id: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Feedback service unavailable: {0}")]
    Upstream(#[from] FeedbackError),

    #[error("An evaluation is already running for session {id}")]
    EvaluationInProgress { id: String },

    #[error("Session store lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InterviewError {
    pub fn not_found(id: &str) -> Self {
        Self::SessionNotFound { id: id.to_string() }
    }
}

/// Errors from the feedback provider.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Provider returned an empty reply")]
    EmptyReply,

    #[error("Missing API key: {0}")]
    MissingApiKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_not_found_carries_id() {
        let err = InterviewError::not_found("abc-123");
        match &err {
            InterviewError::SessionNotFound { id } => assert_eq!(id, "abc-123"),
            _ => panic!("Expected SessionNotFound"),
        }
        assert!(err.to_string().contains("abc-123"));
    }

    #[test]
    fn feedback_error_converts_to_upstream() {
        let err: InterviewError = FeedbackError::Timeout(30).into();
        match &err {
            InterviewError::Upstream(FeedbackError::Timeout(secs)) => assert_eq!(*secs, 30),
            _ => panic!("Expected Upstream(Timeout)"),
        }
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn api_error_reports_status() {
        let err = FeedbackError::Api {
            status: 429,
            message: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "API error (429): rate limited");
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&InterviewError::LockPoisoned);
        assert_std_error(&FeedbackError::EmptyReply);
    }
}
