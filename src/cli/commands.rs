//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "twinrag")]
#[command(about = "Digital twin RAG service with an MCP server")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: level from config)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (MCP endpoint plus REST helpers)
    Serve {
        /// Host to bind to (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable permissive CORS
        #[arg(long)]
        cors: bool,
    },
    /// Serve MCP over stdin/stdout
    Stdio,
    /// Ask the digital twin a single question
    Ask {
        /// The question to ask
        question: String,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Probe configuration and external services
    Health,
    /// Show current configuration (secrets masked)
    Config,
}
