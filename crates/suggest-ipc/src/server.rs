//! IPC server and client.

use crate::protocol::request_id_hint;
use crate::{error_codes, IpcError, IpcResult, Method, Request, Response};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Handler function type for IPC methods. Shared so a dispatch can run it
/// without holding the registry lock.
pub type HandlerFn =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

type Handlers = Arc<RwLock<HashMap<Method, HandlerFn>>>;

/// IPC server listening on a Unix domain socket.
pub struct IpcServer {
    socket_path: PathBuf,
    handlers: Handlers,
    shutdown_tx: broadcast::Sender<()>,
    // Flips to true once the accept loop has stopped.
    closing: watch::Sender<bool>,
    connections: Mutex<JoinSet<()>>,
}

impl IpcServer {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            socket_path: socket_path.into(),
            handlers: Arc::new(RwLock::new(HashMap::new())),
            shutdown_tx,
            closing: watch::Sender::new(false),
            connections: Mutex::new(JoinSet::new()),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Register a handler for a method, replacing any previous one.
    pub async fn register_handler<F, Fut>(&self, method: Method, handler: F)
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let boxed_handler: HandlerFn = Arc::new(move |req| Box::pin(handler(req)));
        self.handlers.write().await.insert(method, boxed_handler);
    }

    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// For handlers that need to trigger shutdown themselves.
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Stop accepting connections. Connections already open finish their
    /// current request and then close; see [`Self::drain_connections`].
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Bind the socket, replacing a leftover socket file.
    pub fn bind(&self) -> IpcResult<UnixListener> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }
        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let listener = UnixListener::bind(&self.socket_path)?;
        info!(path = %self.socket_path.display(), "IPC server listening");
        Ok(listener)
    }

    /// Bind and serve until shutdown.
    pub async fn run(&self) -> IpcResult<()> {
        let listener = self.bind()?;
        self.serve(listener).await
    }

    /// Serve connections on an already bound listener until shutdown, then
    /// remove the socket file.
    ///
    /// Returns once the accept loop has stopped. Open connections keep
    /// running until they have answered their in-flight request; await them
    /// with [`Self::drain_connections`].
    pub async fn serve(&self, listener: UnixListener) -> IpcResult<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _)) => self.spawn_connection(stream),
                        Err(e) => {
                            error!(error = %e, "Accept error");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("IPC server shutting down");
                    break;
                }
            }
        }

        self.closing.send_replace(true);
        let _ = std::fs::remove_file(&self.socket_path);
        Ok(())
    }

    fn spawn_connection(&self, stream: UnixStream) {
        let handlers = self.handlers.clone();
        let closing = self.closing.subscribe();

        let mut connections = self.connections.lock().expect("lock poisoned");
        while connections.try_join_next().is_some() {}
        connections.spawn(async move {
            if let Err(e) = handle_connection(stream, handlers, closing).await {
                error!(error = %e, "Connection error");
            }
        });
    }

    /// Connection tasks not yet finished.
    pub fn open_connections(&self) -> usize {
        let mut connections = self.connections.lock().expect("lock poisoned");
        while connections.try_join_next().is_some() {}
        connections.len()
    }

    /// Wait for every connection to write its pending response and close.
    ///
    /// Call after [`Self::serve`] has returned and whatever the handlers wait
    /// on has been released. Connections still busy after `timeout` are
    /// aborted; returns how many were.
    pub async fn drain_connections(&self, timeout: Duration) -> usize {
        let mut connections =
            std::mem::take(&mut *self.connections.lock().expect("lock poisoned"));

        let drained = tokio::time::timeout(timeout, async {
            while connections.join_next().await.is_some() {}
        })
        .await;
        if drained.is_ok() {
            debug!("All IPC connections closed");
            return 0;
        }

        let remaining = connections.len();
        warn!(remaining, "Aborting IPC connections still busy after drain timeout");
        connections.shutdown().await;
        remaining
    }
}

/// Serve one client: read request lines until EOF or server shutdown, answer
/// each in order. A request being handled is always answered.
async fn handle_connection(
    stream: UnixStream,
    handlers: Handlers,
    mut closing: watch::Receiver<bool>,
) -> IpcResult<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    debug!("Client connected");

    loop {
        line.clear();
        let read = tokio::select! {
            read = reader.read_line(&mut line) => read?,
            _ = closing.wait_for(|closing| *closing) => {
                debug!("Closing connection for shutdown");
                break;
            }
        };
        if read == 0 {
            debug!("Client disconnected");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match Request::from_json(trimmed) {
            Ok(request) => dispatch(&handlers, request).await,
            Err(e) => {
                warn!(error = %e, "Failed to parse request");
                Response::error(
                    &request_id_hint(trimmed),
                    error_codes::PARSE_ERROR,
                    &format!("Parse error: {}", e),
                )
            }
        };

        write_line(&mut writer, &response.to_json()?).await?;
    }

    Ok(())
}

async fn dispatch(handlers: &Handlers, request: Request) -> Response {
    let id = request.id.clone();
    let method = request.method;
    debug!(%id, method = method.as_str(), "Received request");

    let handler = handlers.read().await.get(&method).cloned();
    match handler {
        Some(handler) => handler(request).await,
        None => Response::error(
            &id,
            error_codes::METHOD_NOT_FOUND,
            &format!("Method not found: {}", method.as_str()),
        ),
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> IpcResult<()> {
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// IPC client. Opens one connection per call.
#[derive(Debug, Clone)]
pub struct IpcClient {
    socket_path: PathBuf,
}

impl IpcClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Send a request and wait for its response.
    pub async fn call(&self, request: Request) -> IpcResult<Response> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| IpcError::Unreachable(format!("{}: {}", self.socket_path.display(), e)))?;

        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        write_line(&mut writer, &request.to_json()?).await?;

        let mut line = String::new();
        reader.read_line(&mut line).await?;
        if line.is_empty() {
            return Err(IpcError::ConnectionClosed);
        }

        let response = Response::from_json(line.trim())?;
        if response.id != request.id {
            return Err(IpcError::Protocol(format!(
                "response id {} does not match request id {}",
                response.id, request.id
            )));
        }
        Ok(response)
    }

    pub async fn call_method(&self, method: Method) -> IpcResult<Response> {
        self.call(Request::new(method)).await
    }

    pub async fn call_method_with_params(
        &self,
        method: Method,
        params: serde_json::Value,
    ) -> IpcResult<Response> {
        self.call(Request::with_params(method, params)).await
    }

    /// Whether a daemon answers `health` on the socket.
    pub async fn is_daemon_running(&self) -> bool {
        self.call_method(Method::Health).await.is_ok()
    }
}
