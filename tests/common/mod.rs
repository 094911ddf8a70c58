//! Stub services shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use twinrag::api::AppState;
use twinrag::errors::ProviderFailure;
use twinrag::llm::CompletionRequest;
use twinrag::llm::TextGenerator;
use twinrag::rag::RagService;
use twinrag::services::ClientFactory;
use twinrag::services::ServiceRegistry;
use twinrag::vector::IndexInfo;
use twinrag::vector::VectorMatch;
use twinrag::vector::VectorSearch;
use twinrag::AppConfig;

pub struct FakeIndex {
    matches: Vec<VectorMatch>,
    pub calls: AtomicUsize,
}

impl FakeIndex {
    pub fn with(records: &[(&str, &str, f32)]) -> Self {
        let matches = records
            .iter()
            .enumerate()
            .map(|(i, (title, content, score))| VectorMatch {
                id: Some(json!(i + 1)),
                score: Some(*score),
                metadata: json!({"title": title, "content": content, "category": "profile"})
                    .as_object()
                    .cloned(),
            })
            .collect();
        Self {
            matches,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorSearch for FakeIndex {
    fn name(&self) -> &'static str {
        "fake-index"
    }

    async fn query(&self, _query: &str, top_k: usize) -> Result<Vec<VectorMatch>, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }

    async fn info(&self) -> Result<IndexInfo, ProviderFailure> {
        Ok(IndexInfo {
            vector_count: self.matches.len() as u64,
            dimension: 1024,
        })
    }
}

/// Replays scripted outcomes in order; the last one repeats
pub struct FakeModel {
    script: Mutex<VecDeque<Result<String, ProviderFailure>>>,
    last: Mutex<Option<CompletionRequest>>,
    pub calls: AtomicUsize,
}

impl FakeModel {
    pub fn answering(answer: &str) -> Self {
        Self::scripted(vec![Ok(answer.to_string())])
    }

    pub fn scripted(script: Vec<Result<String, ProviderFailure>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeModel {
    fn name(&self) -> &'static str {
        "fake-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

struct FakeFactory {
    index: Arc<FakeIndex>,
    model: Arc<FakeModel>,
}

impl ClientFactory for FakeFactory {
    fn vector(&self, _config: &AppConfig) -> twinrag::Result<Arc<dyn VectorSearch>> {
        let client: Arc<dyn VectorSearch> = self.index.clone();
        Ok(client)
    }

    fn generation(&self, _config: &AppConfig) -> twinrag::Result<Arc<dyn TextGenerator>> {
        let client: Arc<dyn TextGenerator> = self.model.clone();
        Ok(client)
    }
}

pub fn credentials() -> AppConfig {
    let mut config = AppConfig::default();
    config.vector.url = "https://twin-index.example.com".into();
    config.vector.token = "vector-token".into();
    config.llm.api_key = "gsk_integration".into();
    config.llm.retry_delay_ms = 5;
    config.logging.file_output = false;
    config
}

pub fn rag_service(config: &AppConfig, index: &Arc<FakeIndex>, model: &Arc<FakeModel>) -> Arc<RagService> {
    let factory = Arc::new(FakeFactory {
        index: Arc::clone(index),
        model: Arc::clone(model),
    });
    let services = Arc::new(ServiceRegistry::with_factory(config.clone(), factory));
    Arc::new(RagService::new(config, services))
}

pub fn app_state(config: &AppConfig, index: &Arc<FakeIndex>, model: &Arc<FakeModel>) -> AppState {
    AppState::new(rag_service(config, index, model), config.server.session_timeout_secs)
}

pub fn profile_index() -> Arc<FakeIndex> {
    Arc::new(FakeIndex::with(&[
        (
            "Technical Skills",
            "Rust, TypeScript, PostgreSQL, Linux networking",
            0.91,
        ),
        (
            "Projects",
            "Built a retrieval-augmented chat assistant",
            0.78,
        ),
    ]))
}
