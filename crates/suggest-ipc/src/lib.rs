//! IPC layer between suggestd and its clients.
//!
//! - Unix domain socket server, one task per connection
//! - newline-delimited JSON request/response protocol
//! - client for the CLI and tests

mod error;
mod protocol;
mod server;

pub use error::{IpcError, IpcResult};
pub use protocol::{error_codes, ErrorInfo, Method, Request, Response};
pub use server::{HandlerFn, IpcClient, IpcServer};
