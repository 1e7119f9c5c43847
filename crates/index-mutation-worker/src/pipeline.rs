//! The ingestion pipeline: validate, enqueue, wait, respond.

use crate::error::{PipelineError, PipelineResult};
use crate::queue::{command_queue, CommandQueue, CommandReceiver};
use crate::rendezvous::{MutationOutcome, Rendezvous};
use crate::worker::{IndexMutationWorker, WorkerStats};
use astp_protocol::{CreateForm, CreateResponse, CreateStatus, ProtocolConstants};
use create_request_validator::{validate, CreateCommand, Validated};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use suggest_index::IndexStore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Pipeline tuning.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// How long a request waits for its mutation before answering with
    /// `Warning:ResultPending`. `None` waits indefinitely.
    pub rendezvous_timeout: Option<Duration>,
}

/// Owns the command queue and the single mutation worker.
///
/// Build one per process, call [`Self::start`] once, share it behind an
/// `Arc`, and call [`Self::shutdown`] on the way out.
pub struct IngestPipeline {
    constants: Arc<ProtocolConstants>,
    config: PipelineConfig,
    store: Arc<dyn IndexStore>,
    // `None` once intake is closed.
    queue: RwLock<Option<CommandQueue>>,
    receiver: Mutex<Option<CommandReceiver>>,
    worker: Mutex<Option<JoinHandle<WorkerStats>>>,
}

impl IngestPipeline {
    pub fn new(
        constants: Arc<ProtocolConstants>,
        store: Arc<dyn IndexStore>,
        config: PipelineConfig,
    ) -> Self {
        let (queue, receiver) = command_queue();
        Self {
            constants,
            config,
            store,
            queue: RwLock::new(Some(queue)),
            receiver: Mutex::new(Some(receiver)),
            worker: Mutex::new(None),
        }
    }

    /// Spawns the worker task. Must be called from within a tokio runtime.
    pub fn start(&self) -> PipelineResult<()> {
        let receiver = self
            .receiver
            .lock()
            .expect("lock poisoned")
            .take()
            .ok_or(PipelineError::AlreadyStarted)?;

        let worker = IndexMutationWorker::new(self.store.clone(), receiver);
        let handle = tokio::spawn(worker.run());
        *self.worker.lock().expect("lock poisoned") = Some(handle);
        Ok(())
    }

    /// Handles one create request end to end.
    ///
    /// Rejected requests are answered immediately. Accepted ones are
    /// enqueued, and the response is returned once the worker has applied
    /// this request's command (or the wait timed out).
    pub async fn create(&self, form: CreateForm) -> CreateResponse {
        let Validated { mut response, command } = validate(form, &self.constants);
        let Some(command) = command else {
            return response;
        };

        let mut rendezvous = match self.submit(command) {
            Ok(rendezvous) => rendezvous,
            Err(err) => {
                response.add_failure(CreateStatus::PipelineClosed, err.to_string());
                return response;
            }
        };

        let outcome = match self.config.rendezvous_timeout {
            None => rendezvous.wait().await,
            Some(timeout) => match rendezvous.wait_for(timeout).await {
                Some(outcome) => outcome,
                None => {
                    warn!(
                        timeout_ms = timeout.as_millis() as u64,
                        "Mutation still pending, answering without result"
                    );
                    response.add_warning(CreateStatus::ResultPending);
                    return response;
                }
            },
        };

        match outcome {
            Ok(MutationOutcome::Applied) => {}
            Ok(MutationOutcome::Failed(err)) => {
                response.add_failure(CreateStatus::IndexWriteFailed, err.to_string());
            }
            Err(err) => {
                response.add_failure(CreateStatus::ResultAbandoned, err.to_string());
            }
        }
        response
    }

    /// Enqueues an accepted command without waiting for it.
    pub fn submit(&self, command: CreateCommand) -> PipelineResult<Rendezvous> {
        let queue = self.queue.read().expect("lock poisoned");
        match queue.as_ref() {
            Some(queue) => queue.enqueue(command),
            None => {
                debug!("Rejected command: pipeline closed");
                Err(PipelineError::Closed)
            }
        }
    }

    /// Stops intake, drains every queued command, and waits for the worker.
    ///
    /// Each drained command is applied and its waiter released. If the
    /// worker was never started, the queue is drained inline. Calling this
    /// again is a no-op.
    pub async fn shutdown(&self) -> PipelineResult<WorkerStats> {
        let queue = self.queue.write().expect("lock poisoned").take();
        let Some(queue) = queue else {
            debug!("Pipeline already shut down");
            return Ok(WorkerStats::default());
        };
        info!(pending = queue.depth(), "Closing ingestion pipeline");
        drop(queue);

        let handle = self.worker.lock().expect("lock poisoned").take();
        let stats = match handle {
            Some(handle) => handle
                .await
                .map_err(|err| PipelineError::Worker(err.to_string()))?,
            None => {
                let receiver = self.receiver.lock().expect("lock poisoned").take();
                match receiver {
                    Some(receiver) => {
                        IndexMutationWorker::new(self.store.clone(), receiver)
                            .run()
                            .await
                    }
                    None => WorkerStats::default(),
                }
            }
        };

        info!(
            applied = stats.applied,
            failed = stats.failed,
            "Ingestion pipeline drained"
        );
        Ok(stats)
    }

    pub fn is_closed(&self) -> bool {
        self.queue.read().expect("lock poisoned").is_none()
    }

    /// Commands waiting to be applied.
    pub fn queue_depth(&self) -> usize {
        self.queue
            .read()
            .expect("lock poisoned")
            .as_ref()
            .map(CommandQueue::depth)
            .unwrap_or(0)
    }

    pub fn constants(&self) -> &ProtocolConstants {
        &self.constants
    }

    pub fn store(&self) -> &Arc<dyn IndexStore> {
        &self.store
    }
}
