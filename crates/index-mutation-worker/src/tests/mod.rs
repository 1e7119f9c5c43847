//! Pipeline tests.
//!
//! - `ordering.rs`   - FIFO application, single writer under concurrency
//! - `rendezvous.rs` - request/worker hand-off, timeouts
//! - `failures.rs`   - store failures and rejected requests
//! - `shutdown.rs`   - intake close, draining, restart guards

mod rendezvous;

use crate::{IngestPipeline, PipelineConfig};
use astp_protocol::{
    CreateForm, CreateStatus, ProtocolConstants, DEFAULT_INDEX_NAME, INDEX_FIELD, KEY_FIELD,
    TERM_FIELD, WEIGHT_FIELD,
};
use create_request_validator::{validate, CreateCommand};
use std::sync::Arc;
use suggest_index::{InMemoryIndexStore, IndexStore, RecordingIndexStore};

const TEST_INDEX: &str = "testIndex";

fn form(term: &str, weight: &str) -> CreateForm {
    CreateForm::multipart()
        .with_field(TERM_FIELD, term)
        .with_field(WEIGHT_FIELD, weight)
}

fn form_in(index: &str, term: &str, weight: &str) -> CreateForm {
    form(term, weight).with_field(INDEX_FIELD, index)
}

fn command(term: &str) -> CreateCommand {
    validate(form(term, "1"), &ProtocolConstants::default())
        .command
        .unwrap()
}

fn recording_store() -> Arc<RecordingIndexStore> {
    Arc::new(RecordingIndexStore::new(InMemoryIndexStore::with_indices([
        DEFAULT_INDEX_NAME,
        TEST_INDEX,
    ])))
}

fn pipeline_with(config: PipelineConfig) -> (Arc<IngestPipeline>, Arc<RecordingIndexStore>) {
    let store = recording_store();
    let pipeline = IngestPipeline::new(
        Arc::new(ProtocolConstants::default()),
        store.clone(),
        config,
    );
    (Arc::new(pipeline), store)
}

fn started_pipeline() -> (Arc<IngestPipeline>, Arc<RecordingIndexStore>) {
    let (pipeline, store) = pipeline_with(PipelineConfig::default());
    pipeline.start().unwrap();
    (pipeline, store)
}

/// Basic workflow: one request goes through validation, the queue, the
/// worker and back.
#[tokio::test]
async fn basic_workflow() {
    let (pipeline, store) = started_pipeline();

    let response = pipeline
        .create(
            form_in(TEST_INDEX, "hello world", "3.5").with_field(KEY_FIELD, "abc"),
        )
        .await;

    assert_eq!(
        response.to_json().unwrap(),
        r#"{"term":"hello world","Warning:noImage":"No image inserted","Status:OK":"Status:OK"}"#
    );

    let entry = store.get(TEST_INDEX, "hello world").unwrap();
    assert_eq!(entry.weight, 3.5);
    assert_eq!(entry.key.as_deref(), Some("abc"));
    assert_eq!(store.len(), 1);

    let stats = pipeline.shutdown().await.unwrap();
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn default_index_receives_unnamed_requests() {
    let (pipeline, store) = started_pipeline();

    let response = pipeline.create(form("plain", "2")).await;

    assert!(response.contains_status(CreateStatus::DefaultIndex));
    assert!(response.contains_status(CreateStatus::Ok));
    assert!(store.get(DEFAULT_INDEX_NAME, "plain").is_some());
    assert!(store.get(TEST_INDEX, "plain").is_none());
}
