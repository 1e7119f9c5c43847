//! Index store errors.

use thiserror::Error;

/// Errors raised by an [`IndexStore`](crate::IndexStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// No index is registered under this name.
    #[error("unknown index: {0}")]
    UnknownIndex(String),

    /// An index with this name already exists.
    #[error("index already exists: {0}")]
    IndexExists(String),

    /// The store refused the write.
    #[error("index write rejected: {0}")]
    Rejected(String),
}

/// Result type alias using IndexError.
pub type IndexResult<T> = Result<T, IndexError>;
