//! Single-writer ingestion pipeline for suggestion indices.
//!
//! Many request tasks validate in parallel; accepted commands funnel through
//! one FIFO queue into one worker, the only writer of the index store. Each
//! request waits on its own one-shot rendezvous and resumes once its command
//! has been applied.
//!
//! ```text
//! request ──validate──▶ CommandQueue ──▶ IndexMutationWorker ──▶ IndexStore
//!    ▲                                          │
//!    └────────────── Rendezvous ◀── CompletionSignal
//! ```

mod container;
mod error;
mod pipeline;
mod queue;
mod rendezvous;
mod worker;

#[cfg(test)]
mod tests;

pub use container::CommandContainer;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{IngestPipeline, PipelineConfig};
pub use queue::{command_queue, CommandQueue, CommandReceiver};
pub use rendezvous::{rendezvous, CompletionSignal, MutationOutcome, Rendezvous};
pub use worker::{IndexMutationWorker, WorkerStats};
