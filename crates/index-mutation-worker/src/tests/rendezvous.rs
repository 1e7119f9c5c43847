//! Tests for the request/worker hand-off.

use super::*;
use crate::{MutationOutcome, PipelineError};
use std::time::Duration;

#[tokio::test]
async fn response_waits_for_its_own_mutation() {
    let (pipeline, store) = started_pipeline();

    let response = pipeline.create(form("waited", "1")).await;

    assert!(response.contains_status(CreateStatus::Ok));
    assert!(store.get(DEFAULT_INDEX_NAME, "waited").is_some());
}

#[tokio::test]
async fn second_wait_returns_immediately() {
    let (pipeline, _store) = started_pipeline();
    let mut rendezvous = pipeline.submit(command("twice")).unwrap();

    assert_eq!(rendezvous.wait().await, Ok(MutationOutcome::Applied));
    assert!(rendezvous.is_complete());
    assert_eq!(
        rendezvous.wait_for(Duration::ZERO).await,
        Some(Ok(MutationOutcome::Applied))
    );
}

#[tokio::test]
async fn each_waiter_is_released_once() {
    let (pipeline, _store) = started_pipeline();

    let mut first = pipeline.submit(command("one")).unwrap();
    let mut second = pipeline.submit(command("two")).unwrap();

    assert!(first.wait().await.unwrap().is_applied());
    assert!(second.wait().await.unwrap().is_applied());
    assert!(first.is_complete() && second.is_complete());
}

#[tokio::test]
async fn timeout_answers_pending_without_retracting() {
    let (pipeline, store) = pipeline_with(PipelineConfig {
        rendezvous_timeout: Some(Duration::from_millis(20)),
    });

    // Worker not running yet, so the wait must time out.
    let response = pipeline.create(form("late", "1")).await;

    assert_eq!(
        response.get("Warning:ResultPending"),
        Some("mutation still pending")
    );
    assert!(response.contains_status(CreateStatus::Ok));
    assert!(!response.has_failure());
    assert!(store.is_empty());

    pipeline.start().unwrap();
    pipeline.shutdown().await.unwrap();
    assert!(store.get(DEFAULT_INDEX_NAME, "late").is_some());
}

#[tokio::test]
async fn timeout_is_not_hit_when_worker_is_fast() {
    let (pipeline, _store) = pipeline_with(PipelineConfig {
        rendezvous_timeout: Some(Duration::from_secs(5)),
    });
    pipeline.start().unwrap();

    let response = pipeline.create(form("fast", "1")).await;
    assert!(!response.contains_status(CreateStatus::ResultPending));
}

#[tokio::test]
async fn waiter_is_abandoned_when_pipeline_is_dropped() {
    let (pipeline, _store) = pipeline_with(PipelineConfig::default());
    let mut rendezvous = pipeline.submit(command("orphan")).unwrap();

    drop(pipeline);
    assert_eq!(rendezvous.wait().await, Err(PipelineError::Abandoned));
}
