//! Vector search service abstraction
//!
//! The pipeline only needs two operations from the vector service: a
//! semantic query returning raw matches and an index summary used by the
//! health check. [`UpstashVectorClient`] implements them over REST; tests
//! supply in-memory implementations.

pub mod client;

pub use client::UpstashVectorClient;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::ProviderFailure;

/// One raw match as returned by the provider, before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Summary of the remote index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    #[serde(default)]
    pub vector_count: u64,
    #[serde(default)]
    pub dimension: u64,
}

/// Semantic search over the knowledge base
#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Query for the `top_k` records closest to `query`, best first
    async fn query(&self, query: &str, top_k: usize) -> Result<Vec<VectorMatch>, ProviderFailure>;

    /// Fetch index statistics
    async fn info(&self) -> Result<IndexInfo, ProviderFailure>;
}
