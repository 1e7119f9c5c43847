//! Create request validation.
//!
//! Turns a typed [`CreateForm`](astp_protocol::CreateForm) into a
//! [`CreateResponse`](astp_protocol::CreateResponse) and, when no fatal error
//! was recorded, a normalized [`CreateCommand`].
//!
//! Validation is pure: no shared state, no I/O, safe to run from any number
//! of request tasks at once.

mod command;
mod validator;

pub use command::{CreateCommand, SuggestionImage};
pub use validator::{validate, Validated};
