//! Suggestion indices.
//!
//! Named, weighted autocomplete indices behind the [`IndexStore`] trait. The
//! ingestion pipeline only ever writes through this trait; how an index
//! ranks or searches its entries is not its concern.

mod error;
mod memory;
mod recording;
mod store;
mod types;

pub use error::{IndexError, IndexResult};
pub use memory::InMemoryIndexStore;
pub use recording::{RecordedInsert, RecordingIndexStore};
pub use store::IndexStore;
pub use types::{NewSuggestion, StoredImage, Suggestion};
