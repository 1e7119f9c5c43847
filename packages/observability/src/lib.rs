//! # Observability
//!
//! Structured logging for the suggestd services.
//!
//! Services call [`init`] or [`init_with_config`] once at startup and log with
//! the standard `tracing` macros. Where the lines end up is decided here:
//!
//! - with the `dev` feature (default), every line is appended as one JSON
//!   object to `~/.suggestd/logs/dev.jsonl`, optionally mirrored to stderr;
//! - without it, a compact stderr formatter is installed.
//!
//! `RUST_LOG` overrides the configured level in both modes.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "suggestd".into(),
//!     default_level: "debug".into(),
//!     also_stderr: true,
//!     ..Default::default()
//! });
//! tracing::info!(index = "generalIndex", "ready");
//! ```

#[cfg(feature = "dev")]
mod dev;

mod json_layer;

pub use json_layer::{JsonLayer, LogEntry};

use std::path::PathBuf;

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, written into every log line.
    pub service_name: String,

    /// Default level filter, e.g. `info` or `suggestd=debug,info`.
    pub default_level: String,

    /// Log file path. Defaults to `~/.suggestd/logs/dev.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit compact logs to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize logging with default settings.
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize logging with custom configuration.
///
/// If the log file cannot be opened, falls back to stderr-only logging and
/// reports the problem there. A second call is ignored.
pub fn init_with_config(config: LogConfig) {
    #[cfg(feature = "dev")]
    {
        if let Err(err) = dev::init_dev_subscriber(&config) {
            init_stderr(&config.default_level);
            tracing::warn!(error = %err, "log file unavailable, logging to stderr only");
        }
    }

    #[cfg(not(feature = "dev"))]
    {
        init_stderr(&config.default_level);
    }
}

fn init_stderr(default_level: &str) {
    use tracing_subscriber::util::SubscriberInitExt;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .try_init();
}

/// `RUST_LOG` if set and valid, else the given default.
pub(crate) fn env_filter(default_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
}

/// Default central log file, `~/.suggestd/logs/dev.jsonl`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".suggestd").join("logs").join("dev.jsonl"))
}

pub use tracing::{debug, error, info, instrument, trace, warn};

pub use tracing::span;

pub use tracing::Level;
