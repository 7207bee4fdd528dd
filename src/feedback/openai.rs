use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::{INTERVIEWER_SYSTEM_PROMPT, evaluation_prompt, hint_prompt};
use super::{Feedback, FeedbackEngine, FeedbackRequest, HintRequest};
use crate::config::FeedbackSection;
use crate::errors::FeedbackError;

/// Feedback engine backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiFeedback {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiFeedback {
    pub fn new(config: &FeedbackSection) -> Result<Self, FeedbackError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            FeedbackError::MissingApiKey(
                "OPENAI_API_KEY not set. Please set your API key using: \
                 export OPENAI_API_KEY='your-api-key-here'"
                    .into(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedbackError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send one system + user exchange and return the assistant text.
    async fn complete(&self, prompt: &str) -> Result<String, FeedbackError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: INTERVIEWER_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!(model = %self.model, "requesting completion");
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "feedback provider returned an error");
            return Err(FeedbackError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| self.transport_error(e))?;
        extract_reply(parsed)
    }

    fn transport_error(&self, err: reqwest::Error) -> FeedbackError {
        if err.is_timeout() {
            FeedbackError::Timeout(self.timeout_secs)
        } else {
            FeedbackError::Http(err.to_string())
        }
    }
}

fn extract_reply(response: ChatResponse) -> Result<String, FeedbackError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(FeedbackError::EmptyReply)
}

#[async_trait]
impl FeedbackEngine for OpenAiFeedback {
    async fn evaluate(&self, request: &FeedbackRequest) -> Result<Feedback, FeedbackError> {
        let prompt = evaluation_prompt(request.section, &request.content, &request.question);
        let reply = self.complete(&prompt).await?;
        Ok(Feedback::from_reply(&reply))
    }

    async fn hint(&self, request: &HintRequest) -> Result<String, FeedbackError> {
        self.complete(&hint_prompt(request.section, &request.question))
            .await
    }
}
