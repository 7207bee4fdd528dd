//! HTTP API server command: `interview-companion serve`.

use anyhow::Result;
use tracing::warn;

use interview_companion::config::AppConfig;

pub async fn cmd_serve(config: &AppConfig) -> Result<()> {
    for warning in config.validate() {
        warn!("{}", warning);
    }
    interview_companion::server::start_server(config).await
}
