//! IPC handler implementations.

pub mod create;
pub mod health;
