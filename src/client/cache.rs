//! Local cache of the active session, kept in `.interview/session.json`.
//!
//! The server is the source of truth. The cache only remembers which session
//! this project directory is working on, and is dropped as soon as the server
//! says that session no longer exists.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ApiClient, ClientError};
use crate::session::{SessionSnapshot, StartedSession};

pub const CACHE_DIR: &str = ".interview";
pub const CACHE_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSession {
    pub session_id: String,
    pub question: String,
    pub server_url: String,
    pub started_at: DateTime<Utc>,
}

impl CachedSession {
    pub fn from_started(started: &StartedSession, server_url: &str) -> Self {
        Self {
            session_id: started.session_id.clone(),
            question: started.question.clone(),
            server_url: server_url.to_string(),
            started_at: Utc::now(),
        }
    }
}

pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            path: project_dir.join(CACHE_DIR).join(CACHE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached session. A missing file is `None`; a corrupt one is
    /// discarded.
    pub fn load(&self) -> Result<Option<CachedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        match serde_json::from_str(&content) {
            Ok(cached) => Ok(Some(cached)),
            Err(e) => {
                debug!(error = %e, "discarding unreadable session cache");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, cached: &CachedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(cached)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Reconcile the cache with the server.
    ///
    /// Returns the live snapshot when the cached session still exists. When
    /// the server no longer knows it, the cache is cleared and `None` is
    /// returned. Any other failure is passed through and the cache is kept.
    pub async fn resume(
        &self,
        client: &ApiClient,
    ) -> Result<Option<(CachedSession, SessionSnapshot)>, ClientError> {
        let Some(cached) = self.load()? else {
            return Ok(None);
        };
        match client.validate(&cached.session_id).await {
            Ok(snapshot) => Ok(Some((cached, snapshot))),
            Err(ClientError::SessionGone(id)) => {
                info!(session_id = %id, "cached session expired on server");
                self.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
