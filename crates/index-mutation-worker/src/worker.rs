//! The index mutation worker.
//!
//! The only code that writes to the index store. It dequeues commands one at
//! a time, applies each, and completes the command's signal exactly once,
//! whether the write succeeded or not. Failed writes are reported, never
//! retried.

use crate::container::CommandContainer;
use crate::queue::CommandReceiver;
use crate::rendezvous::MutationOutcome;
use create_request_validator::{CreateCommand, SuggestionImage};
use std::sync::Arc;
use suggest_index::{IndexStore, NewSuggestion, StoredImage};
use tracing::{debug, info, warn};

/// Counters reported when the worker exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub applied: u64,
    pub failed: u64,
}

impl WorkerStats {
    pub fn processed(&self) -> u64 {
        self.applied + self.failed
    }
}

/// Single consumer of the command queue.
pub struct IndexMutationWorker {
    store: Arc<dyn IndexStore>,
    receiver: CommandReceiver,
    stats: WorkerStats,
    last_sequence: Option<u64>,
}

impl IndexMutationWorker {
    pub fn new(store: Arc<dyn IndexStore>, receiver: CommandReceiver) -> Self {
        Self {
            store,
            receiver,
            stats: WorkerStats::default(),
            last_sequence: None,
        }
    }

    /// Runs until the queue is closed and fully drained.
    pub async fn run(mut self) -> WorkerStats {
        info!("Index mutation worker started");
        while let Some(container) = self.receiver.dequeue().await {
            self.apply(container);
        }
        info!(
            applied = self.stats.applied,
            failed = self.stats.failed,
            "Index mutation worker stopped"
        );
        self.stats
    }

    /// Applies one command and completes its signal.
    pub fn apply(&mut self, container: CommandContainer) {
        let id = container.id();
        let sequence = container.sequence();
        debug_assert!(
            self.last_sequence.map_or(true, |last| sequence > last),
            "commands must be applied in enqueue order"
        );
        self.last_sequence = Some(sequence);

        let waited = container.enqueued_at().elapsed();
        let (command, signal) = container.into_parts();
        let index_name = command.index_name().to_string();

        let outcome = MutationOutcome::from(self.store.insert(&index_name, to_suggestion(command)));
        match &outcome {
            MutationOutcome::Applied => {
                self.stats.applied += 1;
                debug!(
                    %id,
                    sequence,
                    index = %index_name,
                    queued_ms = waited.as_millis() as u64,
                    depth = self.receiver.depth(),
                    "Applied command"
                );
            }
            MutationOutcome::Failed(err) => {
                self.stats.failed += 1;
                warn!(%id, sequence, index = %index_name, error = %err, "Index write failed");
            }
        }

        signal.complete(outcome);
    }

    pub fn stats(&self) -> WorkerStats {
        self.stats
    }
}

fn to_suggestion(command: CreateCommand) -> NewSuggestion {
    let (key, term, weight, _index_name, image) = command.into_parts();
    NewSuggestion {
        term,
        weight,
        key,
        image: image.map(to_stored_image),
    }
}

fn to_stored_image(image: SuggestionImage) -> StoredImage {
    StoredImage {
        media_type: image.media_type,
        width: image.width,
        height: image.height,
        data: image.data,
    }
}
