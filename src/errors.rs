use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwinRagError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Retrieval(String),

    #[error("{0}")]
    Generation(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl TwinRagError {
    /// Map the error onto the closed taxonomy reported to clients
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Retrieval(_) => ErrorKind::RetrievalFailure,
            Self::Generation(_) => ErrorKind::GenerationFailure,
            Self::Http(_)
            | Self::Serialization(_)
            | Self::TomlParsing(_)
            | Self::Io(_)
            | Self::Custom(_) => ErrorKind::Unknown,
        }
    }

    /// Message safe to show to an end user.
    ///
    /// Typed failures already carry a curated message; everything else is
    /// collapsed so provider or filesystem details never reach the wire.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unknown => "An unexpected error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Closed error classification carried by query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Configuration,
    RetrievalFailure,
    GenerationFailure,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::Configuration => "Configuration",
            Self::RetrievalFailure => "RetrievalFailure",
            Self::GenerationFailure => "GenerationFailure",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw failure reported by an external service, before classification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderFailure {
    pub status: Option<u16>,
    pub message: String,
    pub timed_out: bool,
    pub connect: bool,
}

impl ProviderFailure {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            timed_out: false,
            connect: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            timed_out: true,
            connect: false,
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            timed_out: false,
            connect: true,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            timed_out: false,
            connect: false,
        }
    }

    /// Build a failure from a non-success HTTP response.
    ///
    /// Providers report errors as `{"error": "..."}` or
    /// `{"error": {"message": "..."}}`; the raw body is used otherwise.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                let error = v.get("error")?;
                error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .or_else(|| error.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        Self::status(status, message)
    }

    /// Case-insensitive search in the provider message
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.to_lowercase().contains(needle)
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.timed_out || self.mentions("timeout") || self.mentions("timed out")
    }

    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        self.connect || self.mentions("econnrefused") || self.mentions("enotfound")
    }
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
            timed_out: e.is_timeout(),
            connect: e.is_connect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TwinRagError>;
