use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::ErrorKind;
use crate::errors::TwinRagError;

/// Identifier assigned to a record by the vector service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Convert a raw provider id; `None` for null, empty or non-scalar values
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Number(i)),
                None => Some(Self::Text(n.to_string())),
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One normalized hit from the vector service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedRecord {
    pub id: RecordId,
    pub score: f32,
    pub title: String,
    pub content: String,
    /// Remaining non-empty metadata fields (type, category, tags, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RetrievedRecord {
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// A record that contributed text to an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub score: f32,
}

impl SourceRef {
    /// Score rendered as a percentage for citations
    #[must_use]
    pub fn relevance_percent(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Outcome of one RAG invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub success: bool,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<SourceRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub duration_ms: u64,
    /// Set when the answer was built from raw content after generation failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl QueryResult {
    #[must_use]
    pub fn answered(answer: String, context: Vec<SourceRef>, duration_ms: u64) -> Self {
        Self {
            success: true,
            answer,
            context: Some(context),
            error: None,
            error_kind: None,
            duration_ms,
            fallback: false,
        }
    }

    #[must_use]
    pub fn failed(error: &TwinRagError, context: Option<Vec<SourceRef>>, duration_ms: u64) -> Self {
        Self {
            success: false,
            answer: String::new(),
            context,
            error: Some(error.user_message()),
            error_kind: Some(error.kind()),
            duration_ms,
            fallback: false,
        }
    }

    /// Cited sources, empty when none were recorded
    #[must_use]
    pub fn sources(&self) -> &[SourceRef] {
        self.context.as_deref().unwrap_or(&[])
    }
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One prior message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
