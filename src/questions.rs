//! Question corpus.
//!
//! The store never picks questions itself; the interview service asks a
//! `QuestionSource` for one when a session starts.

use rand::seq::IndexedRandom;

use crate::config::QuestionsSection;

/// Supplies the challenge text for a new session.
pub trait QuestionSource: Send + Sync {
    fn random_question(&self) -> String;
}

pub const BUILTIN_QUESTIONS: &[&str] = &[
    "Design a URL shortener like bit.ly or TinyURL",
    "Design a social media feed like Twitter or Facebook",
    "Design a chat system like WhatsApp or Slack",
    "Design a video streaming platform like YouTube or Netflix",
    "Design a ride-sharing service like Uber or Lyft",
    "Design a search engine like Google",
    "Design an online marketplace like Amazon or eBay",
    "Design a notification system for mobile apps",
    "Design a distributed cache system like Redis",
    "Design a file storage service like Dropbox or Google Drive",
    "Design a recommendation system for e-commerce",
    "Design a web crawler system",
    "Design a real-time gaming leaderboard",
    "Design a food delivery system like DoorDash or UberEats",
    "Design a parking lot system",
    "Design a hotel booking system like Booking.com",
    "Design a distributed job scheduler",
    "Design a content delivery network (CDN)",
    "Design a messaging queue system like Apache Kafka",
    "Design a location-based service like Foursquare",
];

/// Uniform random pick from a fixed list.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<String>,
}

impl QuestionBank {
    pub fn builtin() -> Self {
        Self {
            questions: BUILTIN_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Build the bank described by `[questions]`. Blank entries are dropped,
    /// and an empty result falls back to the built-in list.
    pub fn from_config(config: &QuestionsSection) -> Self {
        let extra = config
            .extra
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        let questions: Vec<String> = if config.only_extra {
            extra.collect()
        } else {
            BUILTIN_QUESTIONS
                .iter()
                .map(|q| q.to_string())
                .chain(extra)
                .collect()
        };

        if questions.is_empty() {
            return Self::builtin();
        }
        Self { questions }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

impl QuestionSource for QuestionBank {
    fn random_question(&self) -> String {
        self.questions
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| BUILTIN_QUESTIONS[0].to_string())
    }
}
