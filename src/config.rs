use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Environment variable holding the vector service REST endpoint
pub const ENV_VECTOR_URL: &str = "UPSTASH_VECTOR_REST_URL";
/// Environment variable holding the vector service bearer token
pub const ENV_VECTOR_TOKEN: &str = "UPSTASH_VECTOR_REST_TOKEN";
/// Environment variable holding the generation service API key
pub const ENV_LLM_API_KEY: &str = "GROQ_API_KEY";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "TWINRAG_LOG_LEVEL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: String,
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: "logs".to_string(),
            file_output: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub url: String,
    pub token: String,
    pub top_k: usize,
    pub timeout_ms: u64,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            top_k: 3,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.7,
            top_p: 1.0,
            max_tokens: 500,
            timeout_ms: 15_000,
            max_attempts: 2,
            retry_delay_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub max_question_length: usize,
    pub max_query_length: usize,
    pub max_prompt_length: usize,
    /// Answer from raw retrieved content when generation is exhausted
    pub fallback_enabled: bool,
    pub fallback_max_chars: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_question_length: 1_000,
            max_query_length: 5_000,
            max_prompt_length: 30_000,
            fallback_enabled: false,
            fallback_max_chars: 300,
        }
    }
}

/// Persona and prompt wording used by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub system_prompt: String,
    /// Single-shot prompt; `{{context}}` and `{{question}}` are substituted
    pub user_template: String,
    /// Prompt used when prior conversation turns are supplied
    pub chat_template: String,
    pub no_results_answer: String,
    pub no_content_answer: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are an AI digital twin. Answer questions as if you are the person, \
                speaking in first person about your background, skills, and experience. \
                Be professional, concise, and authentic. Never invent achievements or experience \
                that are not in the information you are given."
                .to_string(),
            user_template: "Based on the following information about yourself, answer the question.\n\
                Speak in first person as if you are describing your own background.\n\
                Be professional, concise, and authentic.\n\n\
                Your Information:\n{{context}}\n\n\
                Question: {{question}}\n\n\
                Provide a helpful, professional response:"
                .to_string(),
            chat_template: "Relevant information about yourself:\n{{context}}\n\n\
                Visitor's question: {{question}}\n\n\
                Use the earlier conversation to tell whether this is a follow-up or a new topic. \
                Answer in first person, in two or three sentences, without repeating earlier answers \
                word for word. If the information above does not cover the question, say so."
                .to_string(),
            no_results_answer: "I don't have specific information about that topic. \
                Try asking about my technical skills, projects, education, or career goals."
                .to_string(),
            no_content_answer:
                "I found some information but couldn't extract meaningful details.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub session_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            enable_cors: false,
            session_timeout_secs: 3_600,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find the configuration file to use, if any
    #[must_use]
    pub fn locate() -> Option<PathBuf> {
        ["config.toml", "config.example.toml"]
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Load configuration from the default file path, then apply environment overrides.
    ///
    /// Missing files are not an error: service credentials usually arrive
    /// through the environment and are validated on first use.
    pub fn load() -> crate::Result<Self> {
        let mut config = match Self::locate() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path (or the default lookup) and apply the environment
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => {
                let mut config = Self::from_file(path)?;
                config.apply_env_overrides();
                Ok(config)
            }
            None => Self::load(),
        }
    }

    /// Overlay values from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup; blank values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_VECTOR_URL) {
            self.vector.url = url;
        }
        if let Some(token) = get(ENV_VECTOR_TOKEN) {
            self.vector.token = token;
        }
        if let Some(key) = get(ENV_LLM_API_KEY) {
            self.llm.api_key = key;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    /// Names of required service settings that are not set
    #[must_use]
    pub fn missing_service_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.vector.url.trim().is_empty() {
            missing.push(ENV_VECTOR_URL);
        }
        if self.vector.token.trim().is_empty() {
            missing.push(ENV_VECTOR_TOKEN);
        }
        if self.llm.api_key.trim().is_empty() {
            missing.push(ENV_LLM_API_KEY);
        }
        missing
    }

    /// Validate that every external service can be reached with this configuration
    pub fn validate_services(&self) -> crate::Result<()> {
        let missing = self.missing_service_settings();
        if !missing.is_empty() {
            return Err(crate::TwinRagError::Configuration(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )));
        }

        if url::Url::parse(&self.vector.url).is_err() {
            return Err(crate::TwinRagError::Configuration(format!(
                "Invalid {ENV_VECTOR_URL}: not a valid URL"
            )));
        }
        if url::Url::parse(&self.llm.endpoint).is_err() {
            return Err(crate::TwinRagError::Configuration(
                "Invalid generation service endpoint: not a valid URL".to_string(),
            ));
        }

        let blank_answers: Vec<&str> = [
            ("persona.no_results_answer", &self.persona.no_results_answer),
            ("persona.no_content_answer", &self.persona.no_content_answer),
        ]
        .into_iter()
        .filter(|(_, answer)| answer.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !blank_answers.is_empty() {
            return Err(crate::TwinRagError::Configuration(format!(
                "Placeholder answers must not be blank: {}",
                blank_answers.join(", ")
            )));
        }

        Ok(())
    }

    /// Get vector service URL
    pub fn vector_url(&self) -> &str {
        &self.vector.url
    }

    /// Get default retrieval result count
    pub fn top_k(&self) -> usize {
        self.vector.top_k
    }

    /// Get vector query deadline
    pub fn vector_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.vector.timeout_ms)
    }

    /// Get generation service endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get generation model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get per-attempt generation deadline
    pub fn llm_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.llm.timeout_ms)
    }

    /// Get delay between generation attempts
    pub fn llm_retry_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.llm.retry_delay_ms)
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Mask a secret for display, keeping only a short prefix
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}****")
}

/// Mask a URL for display (scheme and host only)
#[must_use]
pub fn mask_url(raw: &str) -> String {
    if raw.is_empty() {
        return "(not set)".to_string();
    }
    match url::Url::parse(raw) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}/...", parsed.scheme(), host),
            None => "***".to_string(),
        },
        Err(_) => "***".to_string(),
    }
}
