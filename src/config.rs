//! Configuration for the interview companion.
//!
//! Settings are layered file → environment → CLI. The file is optional and
//! lives at `interview.toml` in the project directory unless `--config` points
//! elsewhere.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8000
//! cors_origins = ["http://localhost:3000"]
//!
//! [feedback]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! temperature = 0.7
//! timeout_secs = 60
//!
//! [questions]
//! extra = ["Design a pastebin"]
//! only_extra = false
//!
//! [client]
//! server_url = "http://127.0.0.1:8000"
//! ```
//!
//! Environment overrides: `OPENAI_API_KEY`, `OPENAI_BASE_URL`,
//! `INTERVIEW_MODEL`, `INTERVIEW_HOST`, `INTERVIEW_PORT`, `INTERVIEW_SERVER`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "interview.toml";

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty disables the CORS layer.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerSection {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Language-model provider settings (any OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on a single feedback call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prefer `OPENAI_API_KEY`; a key in the file is accepted but never echoed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for FeedbackSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

/// Question corpus settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionsSection {
    /// Questions added to the built-in list.
    #[serde(default)]
    pub extra: Vec<String>,
    /// Use only `extra`, ignoring the built-in list.
    #[serde(default)]
    pub only_extra: bool,
}

/// Terminal client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

/// The complete interview.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub feedback: FeedbackSection,
    #[serde(default)]
    pub questions: QuestionsSection,
    #[serde(default)]
    pub client: ClientSection,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse interview.toml")
    }

    /// Resolve the full layered configuration.
    ///
    /// An explicit `path` must exist. Otherwise `interview.toml` in
    /// `project_dir` is used when present, and defaults when not. Environment
    /// variables are applied last.
    pub fn load(path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let default_path = Self::default_path(project_dir);
                if default_path.exists() {
                    Self::load_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn default_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE_NAME)
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.feedback.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.feedback.base_url = url;
        }
        if let Some(model) = non_empty("INTERVIEW_MODEL") {
            self.feedback.model = model;
        }
        if let Some(host) = non_empty("INTERVIEW_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty("INTERVIEW_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("INTERVIEW_PORT is not a valid port: {}", port))?;
        }
        if let Some(url) = non_empty("INTERVIEW_SERVER") {
            self.client.server_url = url;
        }
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize interview.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// TOML rendering with the API key masked, for `config show`.
    pub fn to_display_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if let Some(key) = shown.feedback.api_key.as_mut() {
            *key = mask_secret(key);
        }
        toml::to_string_pretty(&shown).context("Failed to serialize configuration")
    }

    /// Problems worth reporting before starting the server.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.feedback.api_key.is_none() {
            warnings.push(
                "OPENAI_API_KEY is not set; `serve` will refuse to start. \
                 Set it with: export OPENAI_API_KEY='your-api-key-here'"
                    .to_string(),
            );
        }
        if self.feedback.timeout_secs == 0 {
            warnings.push("feedback.timeout_secs is 0; every evaluation will time out".to_string());
        }
        if !(0.0..=2.0).contains(&self.feedback.temperature) {
            warnings.push(format!(
                "feedback.temperature {} is outside 0.0..=2.0",
                self.feedback.temperature
            ));
        }
        if self.questions.only_extra && self.questions.extra.iter().all(|q| q.trim().is_empty()) {
            warnings.push(
                "questions.only_extra is set but no extra questions are listed; \
                 the built-in list will be used"
                    .to_string(),
            );
        }
        warnings
    }
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(3).collect();
    format!("{}…", visible)
}
