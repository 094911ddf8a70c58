//! REST client for the Upstash Vector service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::IndexInfo;
use super::VectorMatch;
use super::VectorSearch;
use crate::errors::ProviderFailure;
use crate::errors::Result;
use crate::errors::TwinRagError;

/// Client for an Upstash Vector index with server-side embedding
pub struct UpstashVectorClient {
    url: String,
    token: String,
    client: Client,
}

impl UpstashVectorClient {
    /// Create a new vector client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid TLS configuration)
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TwinRagError::Configuration(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            url: url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    /// Get the endpoint this client talks to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    result: T,
}

#[async_trait]
impl VectorSearch for UpstashVectorClient {
    fn name(&self) -> &'static str {
        "upstash"
    }

    async fn query(&self, query: &str, top_k: usize) -> std::result::Result<Vec<VectorMatch>, ProviderFailure> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct QueryRequest<'a> {
            data: &'a str,
            top_k: usize,
            include_metadata: bool,
        }

        let url = format!("{}/query-data", self.url);
        debug!("Calling vector query API: {} (top_k={})", url, top_k);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&QueryRequest {
                data: query,
                top_k,
                include_metadata: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderFailure::from_response(response).await);
        }

        let envelope: Envelope<Option<Vec<VectorMatch>>> = response
            .json()
            .await
            .map_err(|e| ProviderFailure::other(format!("Failed to parse response: {e}")))?;

        envelope
            .result
            .ok_or_else(|| ProviderFailure::other("Vector search returned null results"))
    }

    async fn info(&self) -> std::result::Result<IndexInfo, ProviderFailure> {
        let url = format!("{}/info", self.url);
        debug!("Calling vector info API: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderFailure::from_response(response).await);
        }

        let envelope: Envelope<IndexInfo> = response
            .json()
            .await
            .map_err(|e| ProviderFailure::other(format!("Failed to parse response: {e}")))?;

        Ok(envelope.result)
    }
}
