//! Text generation service abstraction
//!
//! [`TextGenerator`] is the seam between the RAG pipeline and the chat
//! completion provider. [`GroqClient`] speaks the OpenAI-compatible
//! chat-completions dialect.

pub mod client;
pub mod prompts;

pub use client::GroqClient;
pub use prompts::PromptTemplate;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::ProviderFailure;
use crate::models::ConversationTurn;

/// Chat message in the provider wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        }
    }
}

/// One completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub history: Vec<ConversationTurn>,
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Flatten into the ordered message list: system, prior turns, prompt
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        if !self.system.is_empty() {
            messages.push(ChatMessage::system(&self.system));
        }
        messages.extend(self.history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(&self.prompt));
        messages
    }
}

/// Chat completion provider
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Produce one completion; the raw text is returned untrimmed
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure>;
}
