//! Shared stubs for unit tests

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::config::AppConfig;
use crate::errors::ProviderFailure;
use crate::llm::CompletionRequest;
use crate::llm::TextGenerator;
use crate::rag::RagService;
use crate::services::ClientFactory;
use crate::services::ServiceRegistry;
use crate::vector::IndexInfo;
use crate::vector::VectorMatch;
use crate::vector::VectorSearch;

/// Vector service returning canned matches or a canned failure
pub struct StubVector {
    matches: Vec<VectorMatch>,
    failure: Option<ProviderFailure>,
    calls: AtomicUsize,
}

impl StubVector {
    pub fn with_records(records: &[(&str, &str, f32)]) -> Self {
        let matches = records
            .iter()
            .enumerate()
            .map(|(i, (title, content, score))| VectorMatch {
                id: Some(json!(format!("doc-{i}"))),
                score: Some(*score),
                metadata: json!({"title": title, "content": content})
                    .as_object()
                    .cloned(),
            })
            .collect();
        Self {
            matches,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_records(&[])
    }

    pub fn failing(failure: ProviderFailure) -> Self {
        Self {
            matches: Vec::new(),
            failure: Some(failure),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorSearch for StubVector {
    fn name(&self) -> &'static str {
        "stub-vector"
    }

    async fn query(&self, _query: &str, top_k: usize) -> Result<Vec<VectorMatch>, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.matches.iter().take(top_k).cloned().collect()),
        }
    }

    async fn info(&self) -> Result<IndexInfo, ProviderFailure> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(IndexInfo {
                vector_count: self.matches.len() as u64,
                dimension: 1024,
            }),
        }
    }
}

/// Generation service returning one canned outcome, recording requests
pub struct StubGenerator {
    reply: Result<String, ProviderFailure>,
    calls: AtomicUsize,
    last_request: std::sync::Mutex<Option<CompletionRequest>>,
}

impl StubGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            reply: Ok(answer.to_string()),
            calls: AtomicUsize::new(0),
            last_request: std::sync::Mutex::new(None),
        }
    }

    pub fn failing(failure: ProviderFailure) -> Self {
        Self {
            reply: Err(failure),
            calls: AtomicUsize::new(0),
            last_request: std::sync::Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &'static str {
        "stub-generator"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.reply.clone()
    }
}

/// Factory handing out the same stub instances
pub struct StubFactory {
    pub vector: Arc<StubVector>,
    pub generator: Arc<StubGenerator>,
}

impl ClientFactory for StubFactory {
    fn vector(&self, _config: &AppConfig) -> crate::Result<Arc<dyn VectorSearch>> {
        let client: Arc<dyn VectorSearch> = self.vector.clone();
        Ok(client)
    }

    fn generation(&self, _config: &AppConfig) -> crate::Result<Arc<dyn TextGenerator>> {
        let client: Arc<dyn TextGenerator> = self.generator.clone();
        Ok(client)
    }
}

/// Configuration with every required service setting present
pub fn configured() -> AppConfig {
    let mut config = AppConfig::default();
    config.vector.url = "https://vec.example.com".into();
    config.vector.token = "token".into();
    config.llm.api_key = "gsk_test".into();
    config.llm.retry_delay_ms = 10;
    config
}

/// Pipeline wired to stubs
pub fn stub_rag(config: &AppConfig, vector: &Arc<StubVector>, generator: &Arc<StubGenerator>) -> RagService {
    let factory = Arc::new(StubFactory {
        vector: Arc::clone(vector),
        generator: Arc::clone(generator),
    });
    let services = Arc::new(ServiceRegistry::with_factory(config.clone(), factory));
    RagService::new(config, services)
}
