use clap::Parser;
use tracing::info;
use twinrag::cli::handle_ask;
use twinrag::cli::handle_config;
use twinrag::cli::handle_health;
use twinrag::cli::handle_serve_api;
use twinrag::cli::handle_stdio;
use twinrag::cli::Cli;
use twinrag::cli::Commands;
use twinrag::config::AppConfig;
use twinrag::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Initialize logging; the guard flushes the file writer on exit
    let log_guard = init_logging(&config.logging, cli.verbose)?;
    info!("Configuration loaded successfully");

    let healthy = match cli.command {
        Commands::Serve { host, port, cors } => {
            handle_serve_api(&config, host, port, cors).await?;
            true
        }
        Commands::Stdio => {
            handle_stdio(&config).await?;
            true
        }
        Commands::Ask { question, json } => handle_ask(&config, &question, json).await?,
        Commands::Health => handle_health(&config).await?,
        Commands::Config => {
            handle_config(&config)?;
            true
        }
    };

    if !healthy {
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}
