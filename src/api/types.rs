//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::models::SourceRef;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Single-shot question
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Chat message, optionally continuing an existing session
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub duration_ms: u64,
}

/// Static description served on `GET /api/mcp`
#[derive(Debug, Serialize)]
pub struct McpEndpointInfo {
    pub name: String,
    pub version: String,
    pub protocol: String,
    pub transport: String,
    pub methods: Vec<String>,
    pub tools: Vec<ToolSummary>,
    pub documentation: String,
    pub example: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}
