//! IPC wiring: method handlers over the daemon state.

pub mod handlers;
mod register;

pub use register::register_handlers;
