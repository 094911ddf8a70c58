//! MCP tool catalog and invocation

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;

use super::protocol::McpError;
use crate::health::run_health_check;
use crate::models::QueryResult;
use crate::rag::RagService;

pub const QUERY_TOOL: &str = "query-digital-twin";
pub const HEALTH_TOOL: &str = "health-check";

/// Tool definition advertised by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result of `tools/call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error,
        }
    }
}

#[must_use]
pub fn catalog() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: QUERY_TOOL.to_string(),
            description: "Query the digital twin's professional profile using RAG \
                (Retrieval-Augmented Generation). Ask questions about work experience, \
                technical skills, projects, education, or career goals."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The question to ask about the person's professional background, skills, or experience"
                    }
                },
                "required": ["question"]
            }),
        },
        ToolDefinition {
            name: HEALTH_TOOL.to_string(),
            description: "Check the health status of all services (vector search, text generation, environment configuration)"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Invoke a tool by name
pub async fn call_tool(
    rag: &RagService,
    name: &str,
    arguments: Option<&Value>,
) -> Result<ToolCallResult, McpError> {
    match name {
        QUERY_TOOL => {
            let question = arguments
                .and_then(|args| args.get("question"))
                .and_then(Value::as_str)
                .filter(|q| !q.is_empty())
                .ok_or_else(|| {
                    McpError::InvalidParams(
                        "Question parameter is required and must be a string".to_string(),
                    )
                })?;

            let result = rag.query(question).await;
            Ok(render_query_result(&result))
        }
        HEALTH_TOOL => {
            let report = run_health_check(rag).await;
            Ok(ToolCallResult::text(report.render(), !report.success))
        }
        other => Err(McpError::UnknownTool(other.to_string())),
    }
}

/// Render a pipeline result as tool text with citations
#[must_use]
pub fn render_query_result(result: &QueryResult) -> ToolCallResult {
    if !result.success {
        let message = result.error.as_deref().unwrap_or("Unknown error occurred");
        return ToolCallResult::text(format!("Error: {message}"), true);
    }

    let mut text = result.answer.clone();
    let sources = result.sources();
    if !sources.is_empty() {
        text.push_str("\n\n---\n**Sources:**\n");
        for (idx, source) in sources.iter().enumerate() {
            text.push_str(&format!(
                "{}. {} (relevance: {})\n",
                idx + 1,
                source.title,
                source.relevance_percent()
            ));
        }
    }
    text.push_str(&format!("\n*Response time: {}ms*", result.duration_ms));

    ToolCallResult::text(text, false)
}
