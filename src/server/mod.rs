//! HTTP API for interview sessions.
//!
//! ```text
//! ┌──────────┐   HTTP   ┌────────────────────────────────────────────┐
//! │  Client  │ ───────> │  mod.rs  (Router, CORS, tracing, serve)    │
//! │ (CLI/UI) │ <─────── │    └─ api.rs  (handlers, AppState)         │
//! └──────────┘   JSON   │         │                                  │
//!                       │         v                                  │
//!                       │  interview::InterviewService               │
//!                       │    ├─ session::SessionStore  (in memory)   │
//!                       │    ├─ questions::QuestionSource            │
//!                       │    └─ feedback::FeedbackEngine  ──> LLM    │
//!                       └────────────────────────────────────────────┘
//! ```

pub mod api;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, http::HeaderValue};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{AppConfig, ServerSection};
use crate::feedback::OpenAiFeedback;
use crate::interview::InterviewService;
use crate::questions::QuestionBank;
use crate::session::SessionStore;
use api::AppState;

/// Build the full application router.
pub fn build_router(state: Arc<AppState>, server: &ServerSection) -> Router {
    let mut app = api::api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&server.cors_origins) {
        app = app.layer(cors);
    }
    app
}

/// CORS for the configured origins. `*` allows any origin; an empty list
/// disables the layer.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return Some(base.allow_origin(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    Some(base.allow_origin(parsed))
}

/// Assemble the production service from configuration.
pub fn build_service(config: &AppConfig) -> Result<InterviewService> {
    let feedback =
        OpenAiFeedback::new(&config.feedback).context("Failed to configure feedback provider")?;
    info!(model = feedback.model(), "feedback provider ready");

    let questions = QuestionBank::from_config(&config.questions);
    info!(questions = questions.len(), "question bank loaded");

    Ok(InterviewService::new(
        SessionStore::new(),
        Arc::new(questions),
        Arc::new(feedback),
    )
    .with_feedback_timeout(Duration::from_secs(config.feedback.timeout_secs)))
}

/// Start the server and run until Ctrl+C.
pub async fn start_server(config: &AppConfig) -> Result<()> {
    let interview = build_service(config)?;
    let state = Arc::new(AppState { interview });
    let app = build_router(state, &config.server);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(address = %local_addr, "interview companion API listening");
    println!("Interview Companion API running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; shutting down");
    }
    println!("\nShutting down...");
}
