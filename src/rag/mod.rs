//! RAG (Retrieval-Augmented Generation) module
//!
//! Turns a free-text question into a grounded first-person answer:
//! - Bounded-time semantic retrieval with failure classification
//! - Context assembly from retrieved records
//! - Retried answer generation under a persona
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use twinrag::config::AppConfig;
//! use twinrag::rag::RagService;
//! use twinrag::services::ServiceRegistry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let services = Arc::new(ServiceRegistry::new(config.clone()));
//!     let service = RagService::new(&config, services);
//!
//!     let result = service.query("What are your technical skills?").await;
//!     println!("Answer: {}", result.answer);
//!     println!("Sources: {}", result.sources().len());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod generator;
pub mod pipeline;
pub mod retriever;

#[cfg(test)]
mod pipeline_tests;

pub use context::ContextAssembler;
pub use generator::classify_generation_failure;
pub use generator::Generator;
pub use pipeline::PipelineStage;
pub use pipeline::RagService;
pub use retriever::classify_retrieval_failure;
pub use retriever::Retriever;
