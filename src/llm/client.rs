//! OpenAI-compatible chat completions client (Groq)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::CompletionRequest;
use super::TextGenerator;
use crate::errors::ProviderFailure;
use crate::errors::Result;
use crate::errors::TwinRagError;

pub struct GroqClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl GroqClient {
    /// Create a new generation client
    ///
    /// # Errors
    /// - HTTP client build errors
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TwinRagError::Configuration(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, ProviderFailure> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!(
            "Calling chat completions API: {} (model={}, max_tokens={})",
            url, request.model, request.max_tokens
        );

        let body = ChatCompletionRequest {
            model: &request.model,
            messages: request.messages(),
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderFailure::from_response(response).await);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::other(format!("Failed to parse response: {e}")))?;

        Ok(parsed.into_text())
    }
}
