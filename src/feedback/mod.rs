//! Feedback provider boundary.
//!
//! The interview service talks to the language model only through the
//! `FeedbackEngine` trait. `OpenAiFeedback` is the production implementation;
//! tests substitute scripted engines.

mod openai;
pub mod prompts;

pub use openai::OpenAiFeedback;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::FeedbackError;
use crate::phase::NoteSection;

/// Input for one section evaluation.
#[derive(Debug, Clone)]
pub struct FeedbackRequest {
    pub section: NoteSection,
    pub content: String,
    pub question: String,
}

/// Input for a hint.
#[derive(Debug, Clone)]
pub struct HintRequest {
    pub section: NoteSection,
    pub question: String,
}

/// Provider reply for an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl Feedback {
    /// Build from free-form reply text, extracting a score when one is stated.
    pub fn from_reply(reply: &str) -> Self {
        Self {
            feedback: reply.trim().to_string(),
            score: parse_score(reply),
        }
    }
}

#[async_trait]
pub trait FeedbackEngine: Send + Sync {
    async fn evaluate(&self, request: &FeedbackRequest) -> Result<Feedback, FeedbackError>;

    async fn hint(&self, request: &HintRequest) -> Result<String, FeedbackError>;
}

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

// "Score: 4/5", "**Score:** 4", "score of 3 out of 5"
static LABELLED_SCORE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bscore\b[^0-9\n]{0,20}(\d{1,2})(?:\.\d+)?\s*(?:/\s*5|out of\s*5)?").unwrap()
});

// "4/5" or "4 out of 5" anywhere
static BARE_SCORE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*(?:/|out of)\s*5\b").unwrap());

/// Extract a 1–5 score from reply text. Out-of-range values count as absent.
pub fn parse_score(text: &str) -> Option<u8> {
    let capture = LABELLED_SCORE_REGEX
        .captures(text)
        .or_else(|| BARE_SCORE_REGEX.captures(text))?;
    let score: u8 = capture.get(1)?.as_str().parse().ok()?;
    (MIN_SCORE..=MAX_SCORE).contains(&score).then_some(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_labelled() {
        assert_eq!(parse_score("Good start.\nScore: 4/5"), Some(4));
        assert_eq!(parse_score("**Score:** 3"), Some(3));
        assert_eq!(parse_score("I'd give this a score of 2 out of 5."), Some(2));
        assert_eq!(parse_score("SCORE - 5"), Some(5));
    }

    #[test]
    fn test_parse_score_bare_fraction() {
        assert_eq!(parse_score("Overall: 3/5. Consider caching."), Some(3));
        assert_eq!(parse_score("Rating 1 out of 5"), Some(1));
    }

    #[test]
    fn test_parse_score_absent() {
        assert_eq!(parse_score("Solid assumptions, but mention read/write ratio."), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn test_parse_score_out_of_range_is_none() {
        assert_eq!(parse_score("Score: 7/5"), None);
        assert_eq!(parse_score("Score: 0"), None);
    }

    #[test]
    fn test_feedback_from_reply_trims_and_scores() {
        let feedback = Feedback::from_reply("\n  Clear and complete.\nScore: 5/5\n");
        assert_eq!(feedback.feedback, "Clear and complete.\nScore: 5/5");
        assert_eq!(feedback.score, Some(5));
    }

    #[test]
    fn test_feedback_json_omits_missing_score() {
        let json = serde_json::to_value(Feedback {
            feedback: "ok".into(),
            score: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"feedback": "ok"}));
    }
}
