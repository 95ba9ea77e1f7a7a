use crate::config::DashboardConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "product-dashboard.log";

/// Send tracing output to a daily log file; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides the configured level. Keep the returned guard alive
/// until exit so buffered lines are flushed.
pub fn init(config: &DashboardConfig) -> Result<WorkerGuard, Box<dyn std::error::Error + Send + Sync>> {
    let log_dir = config.log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()?;

    tracing::debug!(dir = %log_dir.display(), "logging initialised");
    Ok(guard)
}
