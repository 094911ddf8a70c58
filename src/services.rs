//! Lazily constructed, shared handles to the external services

use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::llm::GroqClient;
use crate::llm::TextGenerator;
use crate::vector::UpstashVectorClient;
use crate::vector::VectorSearch;

/// Builds service handles from configuration
pub trait ClientFactory: Send + Sync {
    fn vector(&self, config: &AppConfig) -> Result<Arc<dyn VectorSearch>>;
    fn generation(&self, config: &AppConfig) -> Result<Arc<dyn TextGenerator>>;
}

/// Factory for the REST clients
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    fn vector(&self, config: &AppConfig) -> Result<Arc<dyn VectorSearch>> {
        let client = UpstashVectorClient::new(config.vector_url(), config.vector.token.as_str())?;
        Ok(Arc::new(client))
    }

    fn generation(&self, config: &AppConfig) -> Result<Arc<dyn TextGenerator>> {
        let client = GroqClient::new(config.llm_endpoint(), config.llm.api_key.as_str())?;
        Ok(Arc::new(client))
    }
}

/// Process-lifetime registry of service handles.
///
/// Each handle is built at most once, on first use, after the required
/// settings have been validated. A failed validation leaves the slot empty
/// so a later call can succeed once the configuration is fixed.
pub struct ServiceRegistry {
    config: RwLock<AppConfig>,
    factory: Arc<dyn ClientFactory>,
    vector: OnceCell<Arc<dyn VectorSearch>>,
    generation: OnceCell<Arc<dyn TextGenerator>>,
}

impl ServiceRegistry {
    /// Registry backed by the REST clients
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self::with_factory(config, Arc::new(HttpClientFactory))
    }

    #[must_use]
    pub fn with_factory(config: AppConfig, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            config: RwLock::new(config),
            factory,
            vector: OnceCell::new(),
            generation: OnceCell::new(),
        }
    }

    /// Check that every required setting is present and well formed
    pub async fn validate(&self) -> Result<()> {
        self.config.read().await.validate_services()
    }

    /// Current configuration
    pub async fn snapshot(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Replace the configuration; handles already built are kept
    pub async fn reconfigure(&self, config: AppConfig) {
        *self.config.write().await = config;
    }

    /// Shared vector search handle
    pub async fn vector_client(&self) -> Result<Arc<dyn VectorSearch>> {
        let config = self.config.read().await;
        config.validate_services()?;

        let client = self
            .vector
            .get_or_try_init(|| async {
                let client = self.factory.vector(&config)?;
                info!("Initialized vector client: {}", client.name());
                Ok::<_, crate::TwinRagError>(client)
            })
            .await?;

        debug!("Using vector client: {}", client.name());
        Ok(Arc::clone(client))
    }

    /// Shared generation handle
    pub async fn generation_client(&self) -> Result<Arc<dyn TextGenerator>> {
        let config = self.config.read().await;
        config.validate_services()?;

        let client = self
            .generation
            .get_or_try_init(|| async {
                let client = self.factory.generation(&config)?;
                info!("Initialized generation client: {}", client.name());
                Ok::<_, crate::TwinRagError>(client)
            })
            .await?;

        debug!("Using generation client: {}", client.name());
        Ok(Arc::clone(client))
    }
}
