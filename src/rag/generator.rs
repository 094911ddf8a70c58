//! Bounded-time, retried answer generation

use std::time::Duration;

use tracing::debug;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::ProviderFailure;
use crate::errors::Result;
use crate::errors::TwinRagError;
use crate::llm::CompletionRequest;
use crate::llm::TextGenerator;
use crate::models::ConversationTurn;

const EMPTY_RESPONSE: &str = "Generation service returned an empty response";

/// Generation step with fixed sampling parameters and retry policy
#[derive(Debug, Clone)]
pub struct Generator {
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    max_prompt_length: usize,
    timeout: Duration,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Generator {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.llm_model().to_string(),
            temperature: config.llm.temperature,
            top_p: config.llm.top_p,
            max_tokens: config.llm.max_tokens,
            max_prompt_length: config.rag.max_prompt_length,
            timeout: config.llm_timeout(),
            max_attempts: config.llm.max_attempts.max(1),
            retry_delay: config.llm_retry_delay(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Build a request carrying the deployment's sampling parameters
    #[must_use]
    pub fn request(&self, system: &str, history: &[ConversationTurn], prompt: &str) -> CompletionRequest {
        CompletionRequest {
            system: system.to_string(),
            history: history.to_vec(),
            prompt: prompt.to_string(),
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }

    /// Generate an answer, retrying any failure up to the attempt bound.
    ///
    /// # Errors
    /// - `Validation` for empty or over-long prompts (never retried)
    /// - `Generation` once every attempt has failed
    pub async fn generate(&self, client: &dyn TextGenerator, request: &CompletionRequest) -> Result<String> {
        self.validate_prompt(&request.prompt)?;

        let mut last_error = TwinRagError::Generation("Failed to generate response".to_string());
        for attempt in 1..=self.max_attempts {
            match self.attempt(client, request).await {
                Ok(answer) => {
                    debug!("Generated {} chars on attempt {}", answer.len(), attempt);
                    return Ok(answer);
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: generation via {} failed: {}",
                        attempt,
                        self.max_attempts,
                        client.name(),
                        e
                    );
                    last_error = e;
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    /// One attempt under the deadline, with no retry
    pub async fn generate_once(&self, client: &dyn TextGenerator, request: &CompletionRequest) -> Result<String> {
        self.validate_prompt(&request.prompt)?;
        self.attempt(client, request).await
    }

    async fn attempt(&self, client: &dyn TextGenerator, request: &CompletionRequest) -> Result<String> {
        let raw = match tokio::time::timeout(self.timeout, client.complete(request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(failure)) => {
                debug!("Provider failure: {} (status={:?})", failure, failure.status);
                return Err(classify_generation_failure(&failure));
            }
            Err(_) => {
                return Err(classify_generation_failure(&ProviderFailure::timeout(
                    "Generation timeout",
                )))
            }
        };

        let answer = raw.trim();
        if answer.is_empty() {
            return Err(TwinRagError::Generation(EMPTY_RESPONSE.to_string()));
        }
        Ok(answer.to_string())
    }

    fn validate_prompt(&self, prompt: &str) -> Result<()> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(TwinRagError::Validation("Prompt cannot be empty".to_string()));
        }
        if prompt.chars().count() > self.max_prompt_length {
            return Err(TwinRagError::Validation(format!(
                "Prompt too long (max {} characters)",
                self.max_prompt_length
            )));
        }
        Ok(())
    }
}

/// Map a generation provider failure onto a stable error
#[must_use]
pub fn classify_generation_failure(failure: &ProviderFailure) -> TwinRagError {
    let message = if failure.status == Some(401) || failure.mentions("invalid api key") {
        "Invalid generation service API key"
    } else if failure.status == Some(429) || failure.mentions("rate limit") {
        "Generation service rate limit exceeded"
    } else if failure.is_timeout() {
        "Generation request timed out"
    } else if failure.status == Some(400) && failure.mentions("model") {
        "Model unavailable"
    } else if failure.is_unreachable() {
        "Cannot connect to generation service"
    } else if failure.status.is_some_and(|s| s >= 500) {
        "Generation service error"
    } else {
        "Failed to generate response"
    };
    TwinRagError::Generation(message.to_string())
}
