//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, Registry};

/// A boxed subscriber ready to be installed globally.
pub type BoxedSubscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path; rotated hourly
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    ///
    /// `RUST_LOG`, `EXPO_LOG_FORMAT` and `EXPO_LOG_FILE` override the given values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
            format:      std::env::var("EXPO_LOG_FORMAT").unwrap_or_else(|_| format.to_string()),
            log_file:    std::env::var("EXPO_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("EXPO_ENV").unwrap_or_else(|_| default_environment()),
        }
    }

    /// Parsed level, falling back to INFO for unknown values.
    pub fn level_filter(&self) -> LevelFilter { self.level.parse().unwrap_or(LevelFilter::INFO) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// The returned guard flushes the file writer on drop and must outlive the subscriber.
    pub fn build(&self) -> (BoxedSubscriber, Option<WorkerGuard>) {
        let level = self.level_filter();

        let (file_layer, guard) = match self.log_file.as_deref() {
            Some(log_file) => {
                let path = Path::new(log_file);
                let directory = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "expo-leads.log".to_string());
                let appender = tracing_appender::rolling::hourly(directory, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().json().with_writer(non_blocking)),
                    Some(guard),
                )
            },
            None => (None, None),
        };

        let registry = Registry::default().with(level).with(file_layer);

        let subscriber: BoxedSubscriber = match self.format.as_str() {
            "pretty" => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .pretty()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
            "compact" => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .compact()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
            _ => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .json()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
        };

        (subscriber, guard)
    }
}
