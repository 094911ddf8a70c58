//! JSON-RPC 2.0 framing and MCP method dispatch

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use tracing::error;
use tracing::info;

use super::tools;
use crate::rag::RagService;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "digital-twin-mcp-server";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// Protocol-level failures, each mapped to a JSON-RPC error code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum McpError {
    #[error("Invalid JSON")]
    Parse,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    InvalidParams(String),

    #[error("Internal server error")]
    Internal(String),
}

impl McpError {
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Parse => PARSE_ERROR,
            Self::InvalidRequest(_) => INVALID_REQUEST,
            Self::MethodNotFound(_) | Self::UnknownTool(_) => METHOD_NOT_FOUND,
            Self::InvalidParams(_) => INVALID_PARAMS,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// HTTP status used when the error is returned as a plain JSON document
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::MethodNotFound(_) => 404,
            Self::Internal(_) => 500,
            _ => 400,
        }
    }
}

/// Incoming request; `id` is absent for notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&McpError> for JsonRpcError {
    fn from(err: &McpError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: match err {
                McpError::Internal(detail) if !detail.is_empty() => Some(Value::String(detail.clone())),
                _ => None,
            },
        }
    }
}

/// Response carrying exactly one of `result` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(id: Value, err: &McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError::from(err)),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of handling one message
#[derive(Debug, Clone, PartialEq)]
pub enum McpOutcome {
    Success(JsonRpcResponse),
    /// Error response plus the error it was built from
    Failure(JsonRpcResponse, McpError),
    /// Notification acknowledged; nothing to send back
    Notification,
}

impl McpOutcome {
    fn failed(id: Value, err: McpError) -> Self {
        Self::Failure(JsonRpcResponse::failure(id, &err), err)
    }

    /// Response to send, if any
    #[must_use]
    pub const fn response(&self) -> Option<&JsonRpcResponse> {
        match self {
            Self::Success(response) | Self::Failure(response, _) => Some(response),
            Self::Notification => None,
        }
    }
}

/// Frame emitted first on every SSE stream
#[must_use]
pub fn ready_message() -> Value {
    json!({"jsonrpc": JSONRPC_VERSION, "method": "server/ready"})
}

/// Transport-independent MCP dispatcher
#[derive(Clone)]
pub struct McpHandler {
    rag: Arc<RagService>,
}

impl McpHandler {
    #[must_use]
    pub const fn new(rag: Arc<RagService>) -> Self {
        Self { rag }
    }

    /// Parse, validate and dispatch one raw message
    pub async fn handle(&self, body: &str) -> McpOutcome {
        match parse_request(body) {
            Ok(request) => self.dispatch(request).await,
            Err((id, err)) => {
                debug!("Rejected JSON-RPC message: {}", err);
                McpOutcome::failed(id, err)
            }
        }
    }

    /// Dispatch a validated request
    pub async fn dispatch(&self, request: JsonRpcRequest) -> McpOutcome {
        let id = request.id.clone().unwrap_or(Value::Null);
        info!("MCP request: {}", request.method);

        if request.id.is_none() && request.method.starts_with("notifications/") {
            debug!("Acknowledged notification {}", request.method);
            return McpOutcome::Notification;
        }

        let result = match request.method.as_str() {
            "initialize" => Ok(initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::catalog() })),
            "tools/call" => self.call_tool(request.params.as_ref()).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        match result {
            Ok(value) => McpOutcome::Success(JsonRpcResponse::success(id, value)),
            Err(err) => {
                if let McpError::Internal(detail) = &err {
                    error!("MCP internal error: {}", detail);
                }
                McpOutcome::failed(id, err)
            }
        }
    }

    async fn call_tool(&self, params: Option<&Value>) -> Result<Value, McpError> {
        let name = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| McpError::InvalidParams("Tool name is required".to_string()))?;
        let arguments = params.and_then(|p| p.get("arguments"));

        let result = tools::call_tool(&self.rag, name, arguments).await?;
        serde_json::to_value(result).map_err(|e| McpError::Internal(e.to_string()))
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

/// Validate the JSON-RPC envelope; on failure return the best-known id
pub fn parse_request(body: &str) -> Result<JsonRpcRequest, (Value, McpError)> {
    let value: Value = serde_json::from_str(body).map_err(|_| (Value::Null, McpError::Parse))?;

    let Value::Object(map) = value else {
        return Err((
            Value::Null,
            McpError::InvalidRequest("Request must be a JSON object".to_string()),
        ));
    };

    let id = match map.get("id") {
        Some(id @ (Value::String(_) | Value::Number(_))) => Some(id.clone()),
        _ => None,
    };
    let reply_id = id.clone().unwrap_or(Value::Null);

    if map.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err((
            reply_id,
            McpError::InvalidRequest("Invalid JSON-RPC version (must be 2.0)".to_string()),
        ));
    }

    let method = match map.get("method").and_then(Value::as_str) {
        Some(method) if !method.is_empty() => method.to_string(),
        _ => {
            return Err((
                reply_id,
                McpError::InvalidRequest("Method is required".to_string()),
            ))
        }
    };

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id,
        method,
        params: map.get("params").cloned(),
    })
}
