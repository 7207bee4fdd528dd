//! HTTP client for a running interview companion server.
//!
//! The terminal commands never touch the session store directly; they go
//! through `ApiClient`, and keep the active session id in a local
//! [`cache::SessionCache`] that is reconciled with the server on every use.

pub mod cache;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::interview::EvaluationOutcome;
use crate::phase::NoteSection;
use crate::session::{SessionSnapshot, StartedSession};

/// Failures the terminal client distinguishes.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Session {0} no longer exists on the server")]
    SessionGone(String),

    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Could not reach the interview server at {url}. Is `interview-companion serve` running?")]
    Unreachable { url: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct NoteBody<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct EvaluateBody<'a> {
    section: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct HintBody<'a> {
    section: &'a str,
}

#[derive(Deserialize)]
struct HintReply {
    hint: String,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // Evaluations wait on the language model; allow well past its own bound
        let http = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn start(&self) -> Result<StartedSession, ClientError> {
        let resp = self.send(self.http.post(self.url("/api/sessions"))).await?;
        decode(resp, None).await
    }

    /// Fetch the session. A missing session is `ClientError::SessionGone`.
    pub async fn validate(&self, id: &str) -> Result<SessionSnapshot, ClientError> {
        let resp = self
            .send(self.http.get(self.url(&format!("/api/sessions/{}", id))))
            .await?;
        decode(resp, Some(id)).await
    }

    pub async fn update_note(
        &self,
        id: &str,
        section: NoteSection,
        content: &str,
    ) -> Result<SessionSnapshot, ClientError> {
        let url = self.url(&format!("/api/sessions/{}/notes/{}", id, section.as_str()));
        let resp = self
            .send(self.http.put(url).json(&NoteBody { content }))
            .await?;
        decode(resp, Some(id)).await
    }

    pub async fn evaluate(
        &self,
        id: &str,
        section: NoteSection,
        content: &str,
    ) -> Result<EvaluationOutcome, ClientError> {
        let url = self.url(&format!("/api/sessions/{}/evaluations", id));
        let body = EvaluateBody {
            section: section.as_str(),
            content,
        };
        let resp = self.send(self.http.post(url).json(&body)).await?;
        decode(resp, Some(id)).await
    }

    pub async fn hint(&self, id: &str, section: NoteSection) -> Result<String, ClientError> {
        let url = self.url(&format!("/api/sessions/{}/hints", id));
        let body = HintBody {
            section: section.as_str(),
        };
        let resp = self.send(self.http.post(url).json(&body)).await?;
        let reply: HintReply = decode(resp, Some(id)).await?;
        Ok(reply.hint)
    }

    pub async fn end(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .send(self.http.delete(self.url(&format!("/api/sessions/{}", id))))
            .await?;
        check(resp, Some(id)).await.map(|_| ())
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ClientError> {
        request.send().await.map_err(|e| {
            debug!(error = %e, "request failed");
            if e.is_connect() {
                ClientError::Unreachable {
                    url: self.base_url.clone(),
                }
            } else {
                ClientError::Other(anyhow::Error::new(e).context("Request to interview server failed"))
            }
        })
    }
}

/// Map non-success statuses to `ClientError`. A 404 on a session route means
/// the session is gone only when the body is the server's `{"error"}` shape;
/// any other 404 is treated as a rejection so the local cache survives.
async fn check(resp: Response, session_id: Option<&str>) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let error_body = serde_json::from_str::<ErrorBody>(&text).ok();
    if status == StatusCode::NOT_FOUND
        && error_body.is_some()
        && let Some(id) = session_id
    {
        return Err(ClientError::SessionGone(id.to_string()));
    }

    Err(ClientError::Rejected {
        status: status.as_u16(),
        message: error_body.map(|body| body.error).unwrap_or(text),
    })
}

async fn decode<T: DeserializeOwned>(
    resp: Response,
    session_id: Option<&str>,
) -> Result<T, ClientError> {
    let resp = check(resp, session_id).await?;
    resp.json::<T>()
        .await
        .context("Failed to parse server response")
        .map_err(ClientError::Other)
}
