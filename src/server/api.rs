use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::InterviewError;
use crate::interview::InterviewService;
use crate::phase::NoteSection;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub interview: InterviewService,
}

pub type SharedState = Arc<AppState>;

// ── Request / response payload types ──────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateNoteRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    pub section: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct HintRequestBody {
    pub section: String,
}

#[derive(Serialize, Deserialize)]
pub struct HintResponse {
    pub hint: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub active_sessions: usize,
}

// ── Error handling ────────────────────────────────────────────────────

pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Upstream(String),
    Internal(String),
}

/// Shown to users for any provider failure; details stay in the logs.
pub const UPSTREAM_MESSAGE: &str =
    "Feedback is temporarily unavailable. Please try again in a moment.";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

impl From<InterviewError> for ApiError {
    fn from(err: InterviewError) -> Self {
        match err {
            InterviewError::SessionNotFound { .. } => ApiError::NotFound(err.to_string()),
            InterviewError::Validation(msg) => ApiError::BadRequest(msg),
            InterviewError::EvaluationInProgress { .. } => ApiError::Conflict(err.to_string()),
            InterviewError::Upstream(_) => ApiError::Upstream(UPSTREAM_MESSAGE.to_string()),
            InterviewError::LockPoisoned | InterviewError::Other(_) => {
                error!(error = %err, "internal error");
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn parse_section(raw: &str) -> Result<NoteSection, ApiError> {
    NoteSection::from_str(raw).map_err(ApiError::BadRequest)
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/sessions", post(start_session))
        .route(
            "/api/sessions/{id}",
            get(validate_session).delete(end_session),
        )
        .route("/api/sessions/{id}/notes/{section}", put(update_note))
        .route("/api/sessions/{id}/evaluations", post(evaluate_section))
        .route("/api/sessions/{id}/hints", post(request_hint))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "System Design Interview Companion API is running!"
    }))
}

async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".into(),
        service: "interview-companion-api".into(),
        active_sessions: state.interview.store().len(),
    })
}

async fn start_session(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let started = state.interview.start()?;
    Ok((StatusCode::CREATED, Json(started)))
}

async fn validate_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.interview.validate(&id)?))
}

async fn update_note(
    State(state): State<SharedState>,
    Path((id, section)): Path<(String, String)>,
    body: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let section = parse_section(&section)?;
    Ok(Json(state.interview.update_note(&id, section, req.content)?))
}

async fn evaluate_section(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let section = parse_section(&req.section)?;
    let outcome = state.interview.evaluate(&id, section, &req.content).await?;
    Ok(Json(outcome))
}

async fn request_hint(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<HintRequestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let section = parse_section(&req.section)?;
    let hint = state.interview.hint(&id, section).await?;
    Ok(Json(HintResponse { hint }))
}

async fn end_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.interview.end(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FeedbackError;
    use crate::interview::testing::{ScriptedFeedback, service_with};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(feedback: ScriptedFeedback) -> Router {
        let (interview, _) = service_with(feedback);
        api_router().with_state(Arc::new(AppState { interview }))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn start(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/sessions"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let started: serde_json::Value = body_json(response.into_body()).await;
        started["sessionId"].as_str().unwrap().to_string()
    }

    // 1. Health check
    #[tokio::test]
    async fn test_health_check() {
        let app = test_app(ScriptedFeedback::new());
        start(&app).await;

        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["activeSessions"], 1);
    }

    // 2. Root banner
    #[tokio::test]
    async fn test_root_banner() {
        let app = test_app(ScriptedFeedback::new());
        let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["message"].as_str().unwrap().contains("running"));
    }

    // 3. Start session
    #[tokio::test]
    async fn test_start_session_returns_id_and_question() {
        let app = test_app(ScriptedFeedback::new());
        let response = app
            .oneshot(empty_request("POST", "/api/sessions"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let started: serde_json::Value = body_json(response.into_body()).await;
        assert!(started["sessionId"].as_str().is_some());
        assert_eq!(
            started["question"],
            "Design a URL shortener like bit.ly or TinyURL"
        );
    }

    // 4. Validate session
    #[tokio::test]
    async fn test_validate_session_snapshot() {
        let app = test_app(ScriptedFeedback::new());
        let id = start(&app).await;

        let response = app
            .oneshot(empty_request("GET", &format!("/api/sessions/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(snapshot["sessionId"], id.as_str());
        assert_eq!(snapshot["notes"].as_object().unwrap().len(), 6);
        assert_eq!(snapshot["phaseStatus"]["currentPhase"], 1);
        assert_eq!(snapshot["phaseStatus"]["phases"][1]["accessible"], false);
    }

    // 5. Validate unknown session
    #[tokio::test]
    async fn test_validate_unknown_session_is_404() {
        let app = test_app(ScriptedFeedback::new());
        let response = app
            .oneshot(empty_request("GET", "/api/sessions/never-created"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("never-created"));
    }

    // 6. Update note advances the gate
    #[tokio::test]
    async fn test_update_note_moves_current_phase() {
        let app = test_app(ScriptedFeedback::new());
        let id = start(&app).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/sessions/{}/notes/assumptions", id),
                serde_json::json!({"content": "users: 1M DAU"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(snapshot["notes"]["assumptions"], "users: 1M DAU");
        assert_eq!(snapshot["phaseStatus"]["currentPhase"], 2);
        assert_eq!(snapshot["phaseStatus"]["phases"][1]["accessible"], true);
        assert_eq!(snapshot["phaseStatus"]["phases"][2]["accessible"], false);
    }

    // 7. Unknown section key
    #[tokio::test]
    async fn test_update_note_unknown_section_is_400() {
        let app = test_app(ScriptedFeedback::new());
        let id = start(&app).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/sessions/{}/notes/summary", id),
                serde_json::json!({"content": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // 8. Evaluate twice → one entry with the second result
    #[tokio::test]
    async fn test_evaluate_section_replaces_previous() {
        let app = test_app(
            ScriptedFeedback::new()
                .reply("Too vague.", Some(2))
                .reply("Much better.", None),
        );
        let id = start(&app).await;
        let uri = format!("/api/sessions/{}/evaluations", id);

        for content in ["some users", "users: 1M DAU"] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    &uri,
                    serde_json::json!({"section": "assumptions", "content": content}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(empty_request("GET", &format!("/api/sessions/{}", id)))
            .await
            .unwrap();
        let snapshot: serde_json::Value = body_json(response.into_body()).await;
        let evaluations = snapshot["evaluations"].as_array().unwrap();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0]["section"], "Assumptions");
        assert_eq!(evaluations[0]["feedback"], "Much better.");
        assert!(evaluations[0].get("score").is_none());
    }

    // 9. Evaluate response shape
    #[tokio::test]
    async fn test_evaluate_returns_feedback_and_score() {
        let app = test_app(ScriptedFeedback::new().reply("Solid.", Some(5)));
        let id = start(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/evaluations", id),
                serde_json::json!({"section": "assumptions", "content": "read heavy"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(outcome["feedback"], "Solid.");
        assert_eq!(outcome["score"], 5);
        assert_eq!(outcome["evaluation"]["section"], "Assumptions");
        assert!(outcome["evaluation"]["timestamp"].as_str().is_some());
    }

    // 10. Empty content
    #[tokio::test]
    async fn test_evaluate_empty_content_is_400() {
        let app = test_app(ScriptedFeedback::new().reply("unused", None));
        let id = start(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/evaluations", id),
                serde_json::json!({"section": "assumptions", "content": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // 11. Upstream failure
    #[tokio::test]
    async fn test_evaluate_upstream_failure_is_502_with_generic_message() {
        let app = test_app(ScriptedFeedback::new().fail(FeedbackError::Api {
            status: 401,
            message: "invalid api key sk-123".into(),
        }));
        let id = start(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/evaluations", id),
                serde_json::json!({"section": "assumptions", "content": "x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["error"], UPSTREAM_MESSAGE);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/sessions/{}", id)))
            .await
            .unwrap();
        let snapshot: serde_json::Value = body_json(response.into_body()).await;
        assert!(snapshot["evaluations"].as_array().unwrap().is_empty());
    }

    // 12. Hint
    #[tokio::test]
    async fn test_request_hint() {
        let app = test_app(ScriptedFeedback::new());
        let id = start(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/hints", id),
                serde_json::json!({"section": "deepDive"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: HintResponse = body_json(response.into_body()).await;
        assert!(body.hint.contains("Deep Dive"));
    }

    // 13. End session, then validate and end again
    #[tokio::test]
    async fn test_end_session_then_not_found() {
        let app = test_app(ScriptedFeedback::new());
        let id = start(&app).await;
        let uri = format!("/api/sessions/{}", id);

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(empty_request("GET", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // 14. Malformed bodies use the JSON error shape
    #[tokio::test]
    async fn test_evaluate_missing_content_is_400_json() {
        let app = test_app(ScriptedFeedback::new());
        let id = start(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/evaluations", id),
                serde_json::json!({"section": "assumptions"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("content"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/sessions/{}/notes/assumptions", id))
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert!(body["error"].is_string());
    }

    // 15. Hint upstream failure
    #[tokio::test]
    async fn test_hint_upstream_failure_is_502() {
        let app = test_app(ScriptedFeedback::new().fail_hints());
        let id = start(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/hints", id),
                serde_json::json!({"section": "assumptions"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = body_json(response.into_body()).await;
        assert_eq!(body["error"], UPSTREAM_MESSAGE);
    }

    #[test]
    fn test_interview_errors_map_to_status_codes() {
        let cases = [
            (InterviewError::not_found("x"), StatusCode::NOT_FOUND),
            (InterviewError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                InterviewError::EvaluationInProgress { id: "x".into() },
                StatusCode::CONFLICT,
            ),
            (
                InterviewError::Upstream(FeedbackError::EmptyReply),
                StatusCode::BAD_GATEWAY,
            ),
            (InterviewError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
