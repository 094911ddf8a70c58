//! Bounded-time semantic retrieval

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::ProviderFailure;
use crate::errors::Result;
use crate::errors::TwinRagError;
use crate::models::RecordId;
use crate::models::RetrievedRecord;
use crate::vector::VectorMatch;
use crate::vector::VectorSearch;

/// Title used when a record carries none
pub const DEFAULT_TITLE: &str = "Information";

/// Retriever over a vector search handle
#[derive(Debug, Clone)]
pub struct Retriever {
    top_k: usize,
    max_query_length: usize,
    timeout: Duration,
}

impl Retriever {
    #[must_use]
    pub const fn new(top_k: usize, max_query_length: usize, timeout: Duration) -> Self {
        Self {
            top_k,
            max_query_length,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.top_k(),
            config.rag.max_query_length,
            config.vector_timeout(),
        )
    }

    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve the configured number of records for `query`
    pub async fn retrieve(&self, client: &dyn VectorSearch, query: &str) -> Result<Vec<RetrievedRecord>> {
        self.retrieve_top(client, query, self.top_k).await
    }

    /// Retrieve up to `top_k` records, best first.
    ///
    /// # Errors
    /// - `Validation` for empty or over-long queries
    /// - `Retrieval` for provider failures, including the deadline expiring
    pub async fn retrieve_top(
        &self,
        client: &dyn VectorSearch,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TwinRagError::Validation("Query cannot be empty".to_string()));
        }
        if query.chars().count() > self.max_query_length {
            return Err(TwinRagError::Validation(format!(
                "Query too long (max {} characters)",
                self.max_query_length
            )));
        }

        debug!("Searching {} for top {} matches", client.name(), top_k);

        let matches = match tokio::time::timeout(self.timeout, client.query(query, top_k)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(failure)) => {
                warn!("Vector search failed: {} (status={:?})", failure, failure.status);
                return Err(classify_retrieval_failure(&failure));
            }
            Err(_) => {
                warn!("Vector search exceeded {:?}", self.timeout);
                return Err(classify_retrieval_failure(&ProviderFailure::timeout(
                    "Query timeout",
                )));
            }
        };

        let records = normalize_matches(matches);
        debug!("Retrieved {} records", records.len());
        Ok(records)
    }
}

/// Convert raw matches into records, keeping provider order.
///
/// Matches without a usable id are dropped.
#[must_use]
pub fn normalize_matches(matches: Vec<VectorMatch>) -> Vec<RetrievedRecord> {
    matches
        .into_iter()
        .filter_map(|m| {
            let id = RecordId::from_value(m.id.as_ref()?)?;
            let mut metadata = m.metadata.unwrap_or_default();

            let title = take_string(&mut metadata, "title")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string());
            let content = take_string(&mut metadata, "content").unwrap_or_default();

            let metadata: HashMap<String, serde_json::Value> = metadata
                .into_iter()
                .filter(|(_, v)| !is_empty_value(v))
                .collect();

            Some(RetrievedRecord {
                id,
                score: m.score.unwrap_or(0.0),
                title,
                content,
                metadata,
            })
        })
        .collect()
}

fn take_string(map: &mut serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn is_empty_value(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Map a vector provider failure onto a stable retrieval error
#[must_use]
pub fn classify_retrieval_failure(failure: &ProviderFailure) -> TwinRagError {
    let message = if failure.status == Some(401) || failure.mentions("unauthorized") {
        "Invalid vector service credentials"
    } else if failure.status == Some(404) || failure.mentions("not found") {
        "Vector index not found"
    } else if failure.status == Some(429) || failure.mentions("rate limit") {
        "Vector service rate limit exceeded"
    } else if failure.is_timeout() {
        "Vector search timed out"
    } else if failure.is_unreachable() {
        "Cannot connect to vector service"
    } else {
        "Failed to search vector database"
    };
    TwinRagError::Retrieval(message.to_string())
}
