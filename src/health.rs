//! Service health probes

use serde::Deserialize;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::config::mask_url;
use crate::errors::Result;
use crate::errors::TwinRagError;
use crate::rag::classify_retrieval_failure;
use crate::rag::RagService;

const VECTOR_PROBE_QUERY: &str = "health check test";
const GENERATION_PROBE_PROMPT: &str = "test";
const GENERATION_PROBE_TOKENS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub environment: bool,
    pub vector: bool,
    pub generation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub success: bool,
    pub services: ServiceStatus,
    pub errors: Vec<String>,
    pub details: HealthDetails,
}

impl HealthReport {
    /// Render the report as markdown-flavoured text
    #[must_use]
    pub fn render(&self) -> String {
        let mark = |ok: bool| if ok { "✅" } else { "❌" };

        let mut text = String::from("**Health Check Results**\n\n");
        text.push_str(&format!(
            "Overall Status: {}\n\n",
            if self.success { "✅ Healthy" } else { "❌ Unhealthy" }
        ));
        text.push_str("**Services:**\n");
        text.push_str(&format!("- Environment: {}\n", mark(self.services.environment)));
        text.push_str(&format!("- Vector Service: {}\n", mark(self.services.vector)));
        text.push_str(&format!("- Generation Service: {}\n", mark(self.services.generation)));

        let details = &self.details;
        if details.vector_count.is_some() || details.model.is_some() || details.vector_url.is_some() {
            text.push_str("\n**Details:**\n");
            if let Some(count) = details.vector_count {
                text.push_str(&format!("- Vector Count: {count}\n"));
            }
            if let Some(model) = &details.model {
                text.push_str(&format!("- Model: {model}\n"));
            }
            if let Some(url) = &details.vector_url {
                text.push_str(&format!("- Vector URL: {url}\n"));
            }
        }

        if !self.errors.is_empty() {
            text.push_str("\n**Errors:**\n");
            for error in &self.errors {
                text.push_str(&format!("- {error}\n"));
            }
        }

        text
    }
}

/// Run the three probes; a failing probe never stops the others
pub async fn run_health_check(rag: &RagService) -> HealthReport {
    let services = rag.services();
    let config = services.snapshot().await;

    let mut report = HealthReport::default();

    match services.validate().await {
        Ok(()) => {
            report.services.environment = true;
            report.details.vector_url = Some(mask_url(config.vector_url()));
            report.details.model = Some(config.llm_model().to_string());
        }
        Err(e) => report.errors.push(format!("Environment: {}", e.user_message())),
    }

    let (vector, generation) = tokio::join!(probe_vector(rag), probe_generation(rag));

    match vector {
        Ok(count) => {
            report.services.vector = true;
            report.details.vector_count = Some(count);
        }
        Err(e) => report.errors.push(format!("Vector service: {}", e.user_message())),
    }

    match generation {
        Ok(()) => report.services.generation = true,
        Err(e) => report.errors.push(format!("Generation service: {}", e.user_message())),
    }

    report.success =
        report.services.environment && report.services.vector && report.services.generation;

    if report.success {
        info!("Health check passed");
    } else {
        warn!("Health check failed: {}", report.errors.join("; "));
    }
    report
}

async fn probe_vector(rag: &RagService) -> Result<u64> {
    let client = rag.services().vector_client().await?;
    rag.retriever()
        .retrieve_top(client.as_ref(), VECTOR_PROBE_QUERY, 1)
        .await?;

    let timeout = rag.services().snapshot().await.vector_timeout();
    let info = match tokio::time::timeout(timeout, client.info()).await {
        Ok(Ok(info)) => info,
        Ok(Err(failure)) => return Err(classify_retrieval_failure(&failure)),
        Err(_) => return Err(TwinRagError::Retrieval("Vector search timed out".to_string())),
    };
    Ok(info.vector_count)
}

async fn probe_generation(rag: &RagService) -> Result<()> {
    let client = rag.services().generation_client().await?;
    let generator = rag.generator();
    let mut request = generator.request("", &[], GENERATION_PROBE_PROMPT);
    request.max_tokens = GENERATION_PROBE_TOKENS;
    generator.generate_once(client.as_ref(), &request).await?;
    Ok(())
}
