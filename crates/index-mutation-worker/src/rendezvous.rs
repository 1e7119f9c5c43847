//! One-shot completion rendezvous between a request and the worker.
//!
//! Each accepted command gets its own pair. The worker owns the
//! [`CompletionSignal`] and writes it exactly once; the request owns the
//! [`Rendezvous`] and waits on it. The write half is consumed by
//! [`CompletionSignal::complete`], so a second write cannot be expressed.
//!
//! If the signal is dropped unwritten (the worker went away), the waiter is
//! released with [`PipelineError::Abandoned`] instead of hanging.

use crate::error::{PipelineError, PipelineResult};
use std::time::Duration;
use suggest_index::IndexError;
use tokio::sync::oneshot;
use tracing::debug;

/// Result of applying one command to the index store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Failed(IndexError),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl From<Result<(), IndexError>> for MutationOutcome {
    fn from(result: Result<(), IndexError>) -> Self {
        match result {
            Ok(()) => Self::Applied,
            Err(err) => Self::Failed(err),
        }
    }
}

/// Creates a connected signal / rendezvous pair.
pub fn rendezvous() -> (CompletionSignal, Rendezvous) {
    let (sender, receiver) = oneshot::channel();
    (
        CompletionSignal { sender },
        Rendezvous {
            receiver: Some(receiver),
            outcome: None,
        },
    )
}

/// Write half, held by the worker.
#[derive(Debug)]
pub struct CompletionSignal {
    sender: oneshot::Sender<MutationOutcome>,
}

impl CompletionSignal {
    /// Reports the outcome and releases the waiter.
    ///
    /// A waiter that already gave up is not an error for the worker.
    pub fn complete(self, outcome: MutationOutcome) {
        if self.sender.send(outcome).is_err() {
            debug!("Completion dropped: waiter no longer listening");
        }
    }

    /// Whether the waiting side has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Read half, held by the request.
#[derive(Debug)]
pub struct Rendezvous {
    receiver: Option<oneshot::Receiver<MutationOutcome>>,
    outcome: Option<PipelineResult<MutationOutcome>>,
}

impl Rendezvous {
    /// Waits for the outcome.
    ///
    /// The first successful read caches the outcome; later reads return it
    /// immediately.
    pub async fn wait(&mut self) -> PipelineResult<MutationOutcome> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let outcome = match self.receiver.as_mut() {
            Some(receiver) => receiver.await.map_err(|_| PipelineError::Abandoned),
            None => Err(PipelineError::Abandoned),
        };
        self.settle(outcome)
    }

    /// Like [`Self::wait`], but gives up after `timeout`.
    ///
    /// Returns `None` if the outcome is not available yet. The rendezvous
    /// stays usable, so the caller may wait again later.
    pub async fn wait_for(&mut self, timeout: Duration) -> Option<PipelineResult<MutationOutcome>> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }
        let receiver = match self.receiver.as_mut() {
            Some(receiver) => receiver,
            None => return Some(Err(PipelineError::Abandoned)),
        };
        match tokio::time::timeout(timeout, receiver).await {
            Ok(result) => Some(self.settle(result.map_err(|_| PipelineError::Abandoned))),
            Err(_) => None,
        }
    }

    /// The cached outcome, if the rendezvous has completed.
    pub fn outcome(&self) -> Option<&PipelineResult<MutationOutcome>> {
        self.outcome.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    fn settle(&mut self, outcome: PipelineResult<MutationOutcome>) -> PipelineResult<MutationOutcome> {
        self.receiver = None;
        self.outcome = Some(outcome.clone());
        outcome
    }
}
