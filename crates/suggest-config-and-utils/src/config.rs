//! Daemon configuration.
//!
//! Read from `<base>/config.json` when present; every field has a default,
//! so a partial file is fine. Only the log level can be overridden from the
//! environment.

use crate::{CoreError, CoreResult, Paths};
use astp_protocol::{
    ProtocolConstants, DEFAULT_IMAGE_TYPES, DEFAULT_INDEX_NAME, MAX_NUMBER_OF_SUGGESTIONS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding `log_level`.
pub const LOG_LEVEL_ENV: &str = "SUGGESTD_LOG_LEVEL";

/// Main daemon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Index used when a request names none. Always created at startup.
    pub default_index_name: String,
    /// Additional indices created at startup.
    pub indices: Vec<String>,
    /// Image media types accepted for attachments.
    pub accepted_image_types: Vec<String>,
    /// Suggestions returned per query on the read path.
    pub max_suggestions: usize,
    /// How long a create request waits for its mutation; unset waits
    /// indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendezvous_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            default_index_name: DEFAULT_INDEX_NAME.to_string(),
            indices: Vec::new(),
            accepted_image_types: DEFAULT_IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
            max_suggestions: MAX_NUMBER_OF_SUGGESTIONS,
            rendezvous_timeout_ms: None,
        }
    }
}

impl Config {
    /// Defaults, then environment overrides.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load from `<base>/config.json` if it exists, else defaults; then apply
    /// environment overrides and validate.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var(LOG_LEVEL_ENV) {
            if !log_level.trim().is_empty() {
                self.log_level = log_level.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.default_index_name.trim().is_empty() {
            return Err(CoreError::InvalidConfig {
                field: "default_index_name",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(name) = self.indices.iter().find(|name| name.trim().is_empty()) {
            return Err(CoreError::InvalidConfig {
                field: "indices",
                reason: format!("index name {:?} is empty", name),
            });
        }
        if self.accepted_image_types.is_empty() {
            return Err(CoreError::InvalidConfig {
                field: "accepted_image_types",
                reason: "at least one media type is required".to_string(),
            });
        }
        if self.rendezvous_timeout_ms == Some(0) {
            return Err(CoreError::InvalidConfig {
                field: "rendezvous_timeout_ms",
                reason: "must be positive; omit it to wait indefinitely".to_string(),
            });
        }
        Ok(())
    }

    /// Every index to create at startup: the default one first, then the
    /// configured extras without duplicates.
    pub fn index_names(&self) -> Vec<String> {
        let mut names = vec![self.default_index_name.clone()];
        for name in &self.indices {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// The protocol table handed to the validator.
    pub fn protocol_constants(&self) -> ProtocolConstants {
        ProtocolConstants {
            max_number_of_suggestions: self.max_suggestions,
            ..ProtocolConstants::with_default_index(self.default_index_name.clone())
        }
        .with_image_types(self.accepted_image_types.iter().cloned())
    }

    pub fn rendezvous_timeout(&self) -> Option<Duration> {
        self.rendezvous_timeout_ms.map(Duration::from_millis)
    }
}
