//! # Expo Leads Logging Infrastructure
//!
//! Structured logging utilities for the Expo Leads service.
//! Provides tracing integration with JSON output and environment-based configuration.

pub mod config;
pub mod macros;
pub mod request_id;

pub use config::LoggingConfig;
pub use request_id::{RequestId, REQUEST_ID_HEADER};
pub use tracing_appender::non_blocking::WorkerGuard;
// Re-export tracing macros
pub use tracing::{debug, error, info, trace, warn};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level (debug, info, warn, error)
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to log file
///
/// Keep the returned guard alive for the lifetime of the process when logging to a file.
pub fn init(
    level: &str,
    format: &str,
    log_file: Option<&str>,
) -> Result<Option<WorkerGuard>, tracing::subscriber::SetGlobalDefaultError> {
    init_with_config(LoggingConfig::from_env(level, format, log_file))
}

/// Initialize logging with a custom configuration.
pub fn init_with_config(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, tracing::subscriber::SetGlobalDefaultError> {
    let (subscriber, guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        level = %config.level,
        format = %config.format,
        environment = %config.environment,
        "Logging initialized"
    );
    Ok(guard)
}
