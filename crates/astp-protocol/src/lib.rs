//! Pure protocol types for the Auto Suggest Transfer Protocol (ASTP) create path.
//!
//! This crate contains only data types and serialization: no I/O, no async,
//! no transport. It defines the shared language between the request validator,
//! the ingestion pipeline and the front end:
//!
//! - [`constants`] - wire field names and numeric limits
//! - [`status`] - every reportable error/warning/success status
//! - [`response`] - the order-preserving create response builder
//! - [`form`] - the strongly-typed parsed create request

pub mod constants;
pub mod form;
pub mod response;
pub mod status;

pub use constants::{
    ProtocolConstants, DEFAULT_IMAGE_TYPES, DEFAULT_INDEX_NAME, IMAGE_FIELD, IMAGE_HEIGHT,
    IMAGE_WIDTH, INDEX_FIELD, KEY_FIELD, MAX_IMAGE_FILE_LENGTH, MAX_KEY_LENGTH,
    MAX_NUMBER_OF_SUGGESTIONS, MAX_SUGGESTION_LENGTH, MULTIPART_CONTENT_TYPE, TERM_FIELD,
    WEIGHT_FIELD,
};
pub use form::{CreateForm, FormError, ImageAttachment};
pub use response::CreateResponse;
pub use status::{CreateStatus, Severity};
