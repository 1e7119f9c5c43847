//! Daemon state definition.

use chrono::{DateTime, Utc};
use index_mutation_worker::{IngestPipeline, PipelineConfig};
use std::sync::Arc;
use suggest_config_and_utils::{Config, Paths};
use suggest_index::{InMemoryIndexStore, IndexStore};

/// Shared daemon state (thread-safe).
#[derive(Clone)]
pub struct DaemonState {
    pub config: Arc<Config>,
    pub paths: Arc<Paths>,
    /// Validation, command queue and the single index writer.
    pub pipeline: Arc<IngestPipeline>,
    /// The same store the pipeline writes to, for read-only reporting.
    pub store: Arc<InMemoryIndexStore>,
    pub started_at: DateTime<Utc>,
}

impl DaemonState {
    /// Builds the store and the pipeline from configuration. The pipeline
    /// is not started.
    pub fn new(config: Config, paths: Paths) -> Self {
        let store = Arc::new(InMemoryIndexStore::with_indices(config.index_names()));
        let writer: Arc<dyn IndexStore> = store.clone();

        let pipeline = IngestPipeline::new(
            Arc::new(config.protocol_constants()),
            writer,
            PipelineConfig {
                rendezvous_timeout: config.rendezvous_timeout(),
            },
        );

        Self {
            config: Arc::new(config),
            paths: Arc::new(paths),
            pipeline: Arc::new(pipeline),
            store,
            started_at: Utc::now(),
        }
    }
}
