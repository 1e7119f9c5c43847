//! Pipeline error types.

use suggest_index::IndexError;
use thiserror::Error;

/// Errors raised by the ingestion pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The pipeline no longer accepts commands.
    #[error("pipeline closed")]
    Closed,

    /// The completion signal was dropped without being written.
    #[error("mutation result abandoned")]
    Abandoned,

    /// `start` was called more than once.
    #[error("pipeline already started")]
    AlreadyStarted,

    /// The worker task ended abnormally.
    #[error("worker task failed: {0}")]
    Worker(String),

    /// The index store rejected a mutation.
    #[error("index write failed: {0}")]
    Index(#[from] IndexError),
}

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;
