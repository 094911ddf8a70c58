//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use tracing::warn;

use crate::api::session::SessionManager;
use crate::api::types::*;
use crate::errors::ErrorKind;
use crate::health::run_health_check;
use crate::health::HealthReport;
use crate::mcp::McpHandler;
use crate::models::QueryResult;
use crate::rag::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag: Arc<RagService>,
    pub mcp: McpHandler,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Build state around a pipeline; starts the session cleanup task
    #[must_use]
    pub fn new(rag: Arc<RagService>, session_timeout_secs: u64) -> Self {
        Self {
            mcp: McpHandler::new(Arc::clone(&rag)),
            rag,
            sessions: Arc::new(SessionManager::new(session_timeout_secs)),
        }
    }
}

/// HTTP status for a failed pipeline result
const fn status_for(kind: Option<ErrorKind>) -> StatusCode {
    match kind {
        None => StatusCode::OK,
        Some(ErrorKind::Validation) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::Configuration) => StatusCode::SERVICE_UNAVAILABLE,
        Some(ErrorKind::RetrievalFailure | ErrorKind::GenerationFailure) => StatusCode::BAD_GATEWAY,
        Some(ErrorKind::Unknown) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthReport>>) {
    info!("GET /api/health");
    let report = run_health_check(&state.rag).await;

    if report.success {
        return (StatusCode::OK, Json(ApiResponse::success(report)));
    }

    let response = ApiResponse {
        success: false,
        error: Some(report.errors.join("; ")),
        data: Some(report),
    };
    (StatusCode::SERVICE_UNAVAILABLE, Json(response))
}

/// Single-shot RAG query
pub async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<QueryResult>) {
    info!("POST /api/query");
    let result = state.rag.query(&req.question).await;
    (status_for(result.error_kind), Json(result))
}

/// Multi-turn chat backed by a session
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse<ChatResponse>>) {
    let session = state.sessions.get_or_create(req.session_id.as_deref());
    info!(
        "POST /api/chat (session {}, {} prior turns)",
        session.session_id,
        session.history.len()
    );

    let result = state
        .rag
        .query_with_history(&req.question, &session.history)
        .await;

    if !result.success {
        let message = result.error.clone().unwrap_or_default();
        warn!("Chat failed for session {}: {}", session.session_id, message);
        return (status_for(result.error_kind), Json(ApiResponse::error(message)));
    }

    let session_id = session.session_id;
    state
        .sessions
        .record_exchange(&session_id, req.question.trim(), &result.answer);

    let response = ChatResponse {
        session_id,
        answer: result.answer.clone(),
        sources: result.sources().to_vec(),
        duration_ms: result.duration_ms,
    };
    (StatusCode::OK, Json(ApiResponse::success(response)))
}
