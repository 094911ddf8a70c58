//! Model Context Protocol server
//!
//! JSON-RPC 2.0 dispatch shared by the HTTP/SSE endpoint and the stdio
//! transport, plus the tool catalog exposing the RAG pipeline.

pub mod protocol;
pub mod stdio;
pub mod tools;

pub use protocol::JsonRpcError;
pub use protocol::JsonRpcRequest;
pub use protocol::JsonRpcResponse;
pub use protocol::McpError;
pub use protocol::McpHandler;
pub use protocol::McpOutcome;
pub use stdio::serve_stdio;
pub use tools::ToolCallResult;
