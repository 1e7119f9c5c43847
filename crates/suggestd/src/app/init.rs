//! Daemon initialization.

use crate::app::DaemonState;
use crate::ipc::register_handlers;
use std::time::Duration;
use suggest_config_and_utils::{Config, Paths};
use suggest_ipc::{IpcClient, IpcServer, Method};
use tracing::{info, warn};

/// How long connections get to write their final responses on shutdown.
const CONNECTION_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the daemon in the foreground until it is asked to stop.
pub async fn run_daemon(config: Config, paths: Paths) -> Result<(), Box<dyn std::error::Error>> {
    // Singleton enforcement: check if daemon is already running
    let socket_path = paths.socket_file();
    if socket_path.exists() {
        let client = IpcClient::new(&socket_path);
        if client.call_method(Method::Health).await.is_ok() {
            return Err("daemon is already running; use 'suggestd stop' to stop it first".into());
        }
        // Socket exists but daemon not responding
        warn!(socket = %socket_path.display(), "Removing stale socket file");
        let _ = std::fs::remove_file(&socket_path);
    }

    let pid_file = paths.pid_file();
    if pid_file.exists() {
        let _ = std::fs::remove_file(&pid_file);
    }

    info!(
        default_index = %config.default_index_name,
        indices = ?config.index_names(),
        rendezvous_timeout_ms = ?config.rendezvous_timeout_ms,
        "Starting suggestd"
    );

    paths.ensure_dirs()?;

    let pid = std::process::id();
    std::fs::write(&pid_file, pid.to_string())?;
    info!(pid = pid, "Daemon started");

    let state = DaemonState::new(config, paths.clone());
    state.pipeline.start()?;

    let ipc_server = IpcServer::new(paths.socket_file());
    register_handlers(&ipc_server, state.clone()).await;

    // Ctrl-C takes the same path as the shutdown method.
    let shutdown_tx = ipc_server.shutdown_sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt");
            let _ = shutdown_tx.send(());
        }
    });

    info!(
        socket = %paths.socket_file().display(),
        "IPC server starting"
    );
    let server_result = ipc_server.run().await;

    // No new requests past this point; apply what is already queued.
    match state.pipeline.shutdown().await {
        Ok(stats) => info!(
            applied = stats.applied,
            failed = stats.failed,
            "Pipeline drained"
        ),
        Err(e) => warn!(error = %e, "Pipeline did not drain cleanly"),
    }

    // Every waiting create has its result now; let the connections send them.
    let aborted = ipc_server.drain_connections(CONNECTION_DRAIN_TIMEOUT).await;
    if aborted > 0 {
        warn!(aborted, "Dropped connections that did not finish in time");
    }

    let _ = std::fs::remove_file(paths.pid_file());
    let _ = std::fs::remove_file(paths.socket_file());

    info!("Daemon stopped");

    server_result.map_err(|e| e.into())
}
