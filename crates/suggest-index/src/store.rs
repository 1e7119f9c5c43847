//! Write-side interface of the suggestion indices.
//!
//! The ingestion worker is the only caller of [`IndexStore::insert`]; stores
//! therefore never see two writes at once from the pipeline, but they must
//! still be `Send + Sync` so the handle can be shared with read paths.

use crate::types::{NewSuggestion, Suggestion};
use crate::IndexError;

/// A set of named, weighted suggestion indices.
pub trait IndexStore: Send + Sync {
    /// Inserts a suggestion into the named index, replacing any existing
    /// entry for the same term.
    ///
    /// Fails with [`IndexError::UnknownIndex`] if no index has that name.
    fn insert(&self, index_name: &str, suggestion: NewSuggestion) -> Result<(), IndexError>;

    /// Returns the entry for `term` in the named index.
    fn get(&self, index_name: &str, term: &str) -> Option<Suggestion>;

    /// Whether an index with this name exists.
    fn has_index(&self, index_name: &str) -> bool;
}
