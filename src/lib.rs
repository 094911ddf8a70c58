//! A digital twin answering questions about one person.
//!
//! Questions are answered by retrieval-augmented generation: relevant
//! profile records are fetched from a hosted vector index, assembled into
//! a context block and handed to a hosted chat-completion model. The
//! pipeline is exposed as MCP tools over HTTP (plain JSON or SSE framing)
//! and over stdio.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod health;
pub mod llm;
pub mod logging;
pub mod mcp;
pub mod models;
pub mod rag;
pub mod services;
pub mod vector;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
pub mod tests;

pub use config::AppConfig;
pub use errors::*;
