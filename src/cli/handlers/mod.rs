//! CLI command handlers
//!
//! - serve: HTTP server and stdio MCP transport
//! - rag: single questions
//! - info: health and configuration display

pub mod info;
pub mod rag;
pub mod serve;

pub use info::*;
pub use rag::*;
pub use serve::*;

use std::sync::Arc;

use crate::rag::RagService;
use crate::services::ServiceRegistry;
use crate::AppConfig;

/// Pipeline over the REST clients; handles are built on first use
#[must_use]
pub fn build_rag_service(config: &AppConfig) -> Arc<RagService> {
    let services = Arc::new(ServiceRegistry::new(config.clone()));
    Arc::new(RagService::new(config, services))
}
