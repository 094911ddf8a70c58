//! CLI module for the `twinrag` binary
//!
//! - Command line argument parsing
//! - Command handlers (organized by domain in handlers/)
//! - Output formatting

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::*;
pub use handlers::*;
pub use output::*;
