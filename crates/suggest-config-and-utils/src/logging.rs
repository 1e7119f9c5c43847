//! Logging initialization.
//!
//! Thin wrapper over the observability package: structured JSONL goes to
//! `<base>/logs/dev.jsonl`, with `RUST_LOG` taking precedence over the
//! configured level.

use crate::Paths;
use observability::LogConfig;

const SERVICE_NAME: &str = "suggestd";

/// Initialize logging for the daemon.
///
/// `also_stderr` mirrors logs to stderr, for foreground runs.
pub fn init_logging(paths: &Paths, level: &str, also_stderr: bool) {
    init_logging_for_service(SERVICE_NAME, paths, level, also_stderr);
}

/// Initialize logging under a custom service name, e.g. for the CLI client.
pub fn init_logging_for_service(service_name: &str, paths: &Paths, level: &str, also_stderr: bool) {
    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr,
    });
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_all_variants() {
        assert_eq!(parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(parse_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_level("info"), tracing::Level::INFO);
        assert_eq!(parse_level("warn"), tracing::Level::WARN);
        assert_eq!(parse_level("warning"), tracing::Level::WARN);
        assert_eq!(parse_level("ERROR"), tracing::Level::ERROR);
    }

    #[test]
    fn parse_level_unknown_defaults_to_info() {
        assert_eq!(parse_level(""), tracing::Level::INFO);
        assert_eq!(parse_level("verbose"), tracing::Level::INFO);
    }
}
