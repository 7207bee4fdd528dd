//! Interview sessions and their in-memory store.
//!
//! A `Session` owns its notes and at most one `Evaluation` per section. The
//! boundary never sees the internal map; `SessionSnapshot` lists evaluations in
//! phase order.

pub mod store;

pub use store::{EvaluationGuard, SessionStore};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::{NoteSection, Notes, PhaseStatus};

/// Feedback attached to one section's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Human-readable label of the section, e.g. "Assumptions".
    pub section: String,
    pub feedback: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl Evaluation {
    pub fn new(section: NoteSection, feedback: String, score: Option<u8>) -> Self {
        Self {
            section: section.label().to_string(),
            feedback,
            timestamp: Utc::now(),
            score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    question: String,
    notes: Notes,
    evaluations: BTreeMap<NoteSection, Evaluation>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(question: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question,
            notes: Notes::default(),
            evaluations: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn set_note(&mut self, section: NoteSection, content: impl Into<String>) {
        self.notes.set(section, content);
    }

    /// Insert or replace the evaluation for `section`.
    pub fn record_evaluation(&mut self, section: NoteSection, evaluation: Evaluation) {
        self.evaluations.insert(section, evaluation);
    }

    /// Evaluations in display order.
    pub fn evaluations(&self) -> impl Iterator<Item = &Evaluation> {
        self.evaluations.values()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            question: self.question.clone(),
            notes: self.notes.clone(),
            evaluations: self.evaluations().cloned().collect(),
            phase_status: PhaseStatus::from_notes(&self.notes),
            created_at: self.created_at,
        }
    }
}

/// Boundary view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub question: String,
    pub notes: Notes,
    pub evaluations: Vec<Evaluation>,
    pub phase_status: PhaseStatus,
    pub created_at: DateTime<Utc>,
}

/// Reply to a start request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedSession {
    pub session_id: String,
    pub question: String,
}

impl From<&Session> for StartedSession {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            question: session.question.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_empty_notes_and_no_evaluations() {
        let session = Session::new("Design a URL shortener".into());
        assert_eq!(session.notes(), &Notes::default());
        assert_eq!(session.evaluations().count(), 0);
        assert_eq!(session.question(), "Design a URL shortener");
        assert!(uuid::Uuid::parse_str(session.id()).is_ok());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::new("q".into());
        let b = Session::new("q".into());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_record_evaluation_replaces_same_section() {
        let mut session = Session::new("q".into());
        session.record_evaluation(
            NoteSection::Assumptions,
            Evaluation::new(NoteSection::Assumptions, "first".into(), Some(2)),
        );
        session.record_evaluation(
            NoteSection::Assumptions,
            Evaluation::new(NoteSection::Assumptions, "second".into(), None),
        );

        let all: Vec<_> = session.evaluations().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].section, "Assumptions");
        assert_eq!(all[0].feedback, "second");
        assert_eq!(all[0].score, None);
    }

    #[test]
    fn test_snapshot_lists_evaluations_in_phase_order() {
        let mut session = Session::new("q".into());
        for section in [
            NoteSection::DeepDive,
            NoteSection::ResourceEstimation,
            NoteSection::Assumptions,
        ] {
            session.record_evaluation(section, Evaluation::new(section, "ok".into(), Some(3)));
        }

        let labels: Vec<String> = session
            .snapshot()
            .evaluations
            .into_iter()
            .map(|e| e.section)
            .collect();
        assert_eq!(labels, vec!["Resource Estimation", "Assumptions", "Deep Dive"]);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut session = Session::new("Design a chat system".into());
        session.set_note(NoteSection::Assumptions, "1M DAU");
        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["sessionId"], session.id());
        assert_eq!(json["question"], "Design a chat system");
        assert_eq!(json["notes"]["assumptions"], "1M DAU");
        assert_eq!(json["notes"].as_object().unwrap().len(), 6);
        assert_eq!(json["phaseStatus"]["currentPhase"], 2);
        assert!(json["evaluations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_evaluation_omits_missing_score() {
        let eval = Evaluation::new(NoteSection::DeepDive, "fine".into(), None);
        let json = serde_json::to_value(&eval).unwrap();
        assert!(json.get("score").is_none());
        assert_eq!(json["section"], "Deep Dive");
    }
}
