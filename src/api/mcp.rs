//! MCP endpoint: JSON-RPC over plain HTTP or a single-response SSE stream

use std::convert::Infallible;

use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::sse::Event;
use axum::response::sse::Sse;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use futures::stream;
use futures::StreamExt;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing::error;

use super::handlers::AppState;
use super::types::McpEndpointInfo;
use super::types::ToolSummary;
use crate::mcp::protocol::ready_message;
use crate::mcp::protocol::PROTOCOL_VERSION;
use crate::mcp::tools;
use crate::mcp::McpOutcome;

/// Whether the client asked for SSE framing
fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/event-stream"))
}

/// POST /api/mcp
pub async fn handle_mcp(State(state): State<AppState>, headers: HeaderMap, body: String) -> Response {
    if wants_event_stream(&headers) {
        debug!("MCP request over SSE");
        return event_stream(state, body);
    }

    match state.mcp.handle(&body).await {
        McpOutcome::Success(response) => (StatusCode::OK, Json(response)).into_response(),
        McpOutcome::Failure(response, err) => {
            let status = StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(response)).into_response()
        }
        McpOutcome::Notification => StatusCode::ACCEPTED.into_response(),
    }
}

/// Ready frame, then at most one reply frame, then end of stream
fn event_stream(state: AppState, body: String) -> Response {
    let ready = stream::once(async { message_event(&ready_message()) });

    let handler = state.mcp.clone();
    let reply = stream::once(async move { handler.handle(&body).await })
        .filter_map(|outcome| async move { outcome.response().map(message_event) });

    let sse = Sse::new(ready.chain(reply));
    ([(header::CONNECTION, "keep-alive")], sse).into_response()
}

fn message_event<T: Serialize>(payload: &T) -> Result<Event, Infallible> {
    let data = serde_json::to_string(payload).unwrap_or_else(|e| {
        error!("Failed to encode SSE payload: {}", e);
        json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {"code": -32603, "message": "Internal server error"}
        })
        .to_string()
    });
    Ok(Event::default().event("message").data(data))
}

/// GET /api/mcp
pub async fn mcp_info() -> Json<McpEndpointInfo> {
    let tools = tools::catalog()
        .into_iter()
        .map(|t| ToolSummary {
            name: t.name,
            description: t.description,
        })
        .collect();

    Json(McpEndpointInfo {
        name: "Digital Twin MCP Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        protocol: format!("Model Context Protocol (MCP) {PROTOCOL_VERSION}"),
        transport: "HTTP, SSE".to_string(),
        methods: ["initialize", "ping", "tools/list", "tools/call"]
            .into_iter()
            .map(String::from)
            .collect(),
        tools,
        documentation: "Send POST requests with JSON-RPC 2.0 format; set Accept: text/event-stream for SSE framing"
            .to_string(),
        example: json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {
                "name": tools::QUERY_TOOL,
                "arguments": {"question": "What are your technical skills?"}
            }
        }),
    })
}
