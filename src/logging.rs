//! Logging setup
//!
//! Console output always goes to stderr so the stdio MCP transport owns
//! stdout. A daily-rolling file layer is added when enabled in config.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::Result;
use crate::TwinRagError;

const LOG_FILE_PREFIX: &str = "twinrag.log";

/// Build the filter directive for a level, scoping our own crate explicitly
#[must_use]
pub fn filter_directive(level: &str) -> String {
    format!("{level},twinrag={level}")
}

/// Initialize logging from configuration.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the life of the process.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let env_filter = EnvFilter::try_new(filter_directive(level))
        .map_err(|e| TwinRagError::Configuration(format!("Invalid log level '{level}': {e}")))?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(verbose)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = if config.file_output {
        let logs_dir = Path::new(&config.log_dir);
        if !logs_dir.exists() {
            std::fs::create_dir_all(logs_dir)?;
        }
        let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TwinRagError::Custom(format!("Logging already initialized: {e}")))?;

    tracing::debug!("Logging initialized with level: {}", level);
    if config.file_output {
        tracing::debug!("Log files: {}/{}.YYYY-MM-DD", config.log_dir, LOG_FILE_PREFIX);
    }

    Ok(guard)
}
