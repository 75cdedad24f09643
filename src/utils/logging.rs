//! Logging configuration and setup
//!
//! Structured logging for the CampusConnect server: stdout always, plus an
//! optional daily-rolling file when a log directory is configured.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must be held for the lifetime of the process so the
/// non-blocking file writer flushes on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::new(&config.level);

    let guard = if let Some(dir) = &config.file_path {
        let file_appender = tracing_appender::rolling::daily(dir, "campus-connect.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
            .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
            .init();
        None
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}
