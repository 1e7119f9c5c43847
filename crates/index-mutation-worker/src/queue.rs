//! FIFO command queue.
//!
//! Unbounded: producers never wait. Strict enqueue order is preserved end to
//! end because there is a single receiver and every enqueue goes through the
//! same sender.

use crate::container::CommandContainer;
use crate::error::{PipelineError, PipelineResult};
use crate::rendezvous::{rendezvous, Rendezvous};
use create_request_validator::CreateCommand;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::trace;

/// Creates a connected queue / receiver pair.
pub fn command_queue() -> (CommandQueue, CommandReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        CommandQueue {
            sender,
            depth: depth.clone(),
            next_sequence: Mutex::new(0),
        },
        CommandReceiver { receiver, depth },
    )
}

/// Producer side, shared by all request handlers.
#[derive(Debug)]
pub struct CommandQueue {
    sender: mpsc::UnboundedSender<CommandContainer>,
    depth: Arc<AtomicUsize>,
    // Held across the send so sequence order equals channel order.
    next_sequence: Mutex<u64>,
}

impl CommandQueue {
    /// Enqueues a command and returns the rendezvous to wait on.
    ///
    /// Never blocks. Fails with [`PipelineError::Closed`] once the receiver
    /// is gone or closed.
    pub fn enqueue(&self, command: CreateCommand) -> PipelineResult<Rendezvous> {
        let (signal, rendezvous) = rendezvous();
        let mut next_sequence = self.next_sequence.lock().expect("lock poisoned");
        let sequence = *next_sequence;
        let container = CommandContainer::new(sequence, command, signal);
        let id = container.id();

        self.depth.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(container).is_err() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(PipelineError::Closed);
        }
        *next_sequence += 1;
        drop(next_sequence);

        trace!(%id, sequence, depth = self.depth(), "Enqueued command");
        Ok(rendezvous)
    }

    /// Commands enqueued but not yet dequeued.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer side, owned by the worker.
#[derive(Debug)]
pub struct CommandReceiver {
    receiver: mpsc::UnboundedReceiver<CommandContainer>,
    depth: Arc<AtomicUsize>,
}

impl CommandReceiver {
    /// Waits for the next command in enqueue order.
    ///
    /// Returns `None` once the queue is closed and empty.
    pub async fn dequeue(&mut self) -> Option<CommandContainer> {
        let container = self.receiver.recv().await?;
        self.depth.fetch_sub(1, Ordering::SeqCst);
        Some(container)
    }

    /// Stops intake. Already queued commands can still be dequeued.
    pub fn close(&mut self) {
        self.receiver.close();
    }

    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}
