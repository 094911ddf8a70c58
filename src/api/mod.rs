//! HTTP API: MCP endpoint plus REST helpers for queries, chat and health

pub mod handlers;
pub mod mcp;
pub mod routes;
pub mod server;
pub mod session;
pub mod types;

pub use handlers::AppState;
pub use server::build_router;
pub use server::serve_api;
