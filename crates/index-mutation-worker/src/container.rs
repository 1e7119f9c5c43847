//! Queue entry: a command together with its completion signal.

use crate::rendezvous::{CompletionSignal, MutationOutcome};
use create_request_validator::CreateCommand;
use std::time::Instant;
use uuid::Uuid;

/// A command in flight between the request that issued it and the worker.
#[derive(Debug)]
pub struct CommandContainer {
    id: Uuid,
    sequence: u64,
    command: CreateCommand,
    signal: CompletionSignal,
    enqueued_at: Instant,
}

impl CommandContainer {
    pub(crate) fn new(sequence: u64, command: CreateCommand, signal: CompletionSignal) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            command,
            signal,
            enqueued_at: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Position in enqueue order, starting at 0.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn command(&self) -> &CreateCommand {
        &self.command
    }

    pub fn enqueued_at(&self) -> Instant {
        self.enqueued_at
    }

    /// Takes the command out, leaving the signal to be completed separately.
    pub fn into_parts(self) -> (CreateCommand, CompletionSignal) {
        (self.command, self.signal)
    }

    /// Completes the signal without applying the command.
    pub fn complete(self, outcome: MutationOutcome) {
        self.signal.complete(outcome);
    }
}
