//! IPC error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("socket I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// The peer answered, but not with the response we asked for.
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// Nothing is listening on the socket.
    #[error("daemon unreachable: {0}")]
    Unreachable(String),

    /// The daemon answered with an error object.
    #[error("daemon returned error {code}: {message}")]
    Remote { code: i32, message: String },

    #[error("daemon closed the connection before answering")]
    ConnectionClosed,
}

pub type IpcResult<T> = Result<T, IpcError>;
