//! Errors raised while loading configuration and preparing the base directory.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("config or runtime file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No base directory given and no home directory to default to.
    #[error("cannot resolve base directory: {0}")]
    Path(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
