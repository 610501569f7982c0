use crate::config::LoggingConfig;
use crate::error::{Result, ScraperError};
use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// Call once per process, after the configuration is loaded. Components pick up their
/// context from the spans they run in, so there is nothing to tear down.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    fs::create_dir_all(&config.directory)?;

    // Create a non-blocking file appender for daily log rotation
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    // JSON for files, human-readable for the console
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(filter_for(config))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| ScraperError::Config(format!("Logging already initialized: {}", e)))?;

    // We need to keep the guard alive to ensure logs are flushed on exit
    std::mem::forget(guard);
    Ok(())
}

fn filter_for(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.directive))
}
