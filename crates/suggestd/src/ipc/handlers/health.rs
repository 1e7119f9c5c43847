//! Health and shutdown handlers.

use crate::app::DaemonState;
use serde_json::{json, Map, Value};
use suggest_ipc::{IpcServer, Method, Request, Response};
use tracing::info;

/// Register health and shutdown handlers.
pub async fn register(server: &IpcServer, state: DaemonState) {
    server
        .register_handler(Method::Health, move |req| {
            let state = state.clone();
            async move { health(&state, &req) }
        })
        .await;

    let shutdown_tx = server.shutdown_sender();
    server
        .register_handler(Method::Shutdown, move |req| {
            let tx = shutdown_tx.clone();
            async move {
                info!("Shutdown requested over IPC");
                let _ = tx.send(());
                Response::success(&req.id, json!({ "status": "shutting_down" }))
            }
        })
        .await;

    info!("Registered health handlers");
}

fn health(state: &DaemonState, req: &Request) -> Response {
    let indices: Map<String, Value> = state
        .store
        .index_names()
        .into_iter()
        .map(|name| {
            let count = state.store.len(&name).unwrap_or(0);
            (name, json!(count))
        })
        .collect();

    let status = if state.pipeline.is_closed() {
        "draining"
    } else {
        "ok"
    };

    Response::success(
        &req.id,
        json!({
            "status": status,
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at.to_rfc3339(),
            "queue_depth": state.pipeline.queue_depth(),
            "default_index": state.config.default_index_name,
            "base_dir": state.paths.base_dir().display().to_string(),
            "indices": indices,
        }),
    )
}
