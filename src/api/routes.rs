//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;
use super::mcp;

/// Routes mounted under `/api`
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // MCP
        .route("/mcp", post(mcp::handle_mcp).get(mcp::mcp_info))
        // Health check
        .route("/health", get(handlers::health))
        // RAG endpoints
        .route("/query", post(handlers::query))
        .route("/chat", post(handlers::chat))
        .with_state(state)
}
