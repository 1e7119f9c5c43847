//! In-memory index store.

use crate::store::IndexStore;
use crate::types::{NewSuggestion, Suggestion};
use crate::{IndexError, IndexResult};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

type Index = HashMap<String, Suggestion>;

/// Index store kept entirely in memory.
///
/// Indices must be registered before they can be written to; the daemon
/// registers the configured set at startup.
#[derive(Debug, Default)]
pub struct InMemoryIndexStore {
    indices: RwLock<HashMap<String, Index>>,
}

impl InMemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given indices registered. Duplicate names
    /// collapse into one index.
    pub fn with_indices<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let indices: HashMap<String, Index> = names
            .into_iter()
            .map(|name| (name.into(), Index::new()))
            .collect();
        Self {
            indices: RwLock::new(indices),
        }
    }

    /// Registers a new, empty index.
    pub fn create_index(&self, name: &str) -> IndexResult<()> {
        let mut indices = self.indices.write().expect("lock poisoned");
        if indices.contains_key(name) {
            return Err(IndexError::IndexExists(name.to_string()));
        }
        indices.insert(name.to_string(), Index::new());
        info!(index = %name, "Created suggestion index");
        Ok(())
    }

    /// Registered index names, sorted.
    pub fn index_names(&self) -> Vec<String> {
        let indices = self.indices.read().expect("lock poisoned");
        let mut names: Vec<String> = indices.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of suggestions in the named index.
    pub fn len(&self, index_name: &str) -> Option<usize> {
        let indices = self.indices.read().expect("lock poisoned");
        indices.get(index_name).map(HashMap::len)
    }

    /// Total number of suggestions across all indices.
    pub fn total(&self) -> usize {
        let indices = self.indices.read().expect("lock poisoned");
        indices.values().map(HashMap::len).sum()
    }
}

impl IndexStore for InMemoryIndexStore {
    fn insert(&self, index_name: &str, suggestion: NewSuggestion) -> Result<(), IndexError> {
        let mut indices = self.indices.write().expect("lock poisoned");
        let index = indices
            .get_mut(index_name)
            .ok_or_else(|| IndexError::UnknownIndex(index_name.to_string()))?;

        let term = suggestion.term.clone();
        let replaced = index
            .insert(term, Suggestion::from_new(suggestion))
            .is_some();
        debug!(index = %index_name, replaced, size = index.len(), "Stored suggestion");
        Ok(())
    }

    fn get(&self, index_name: &str, term: &str) -> Option<Suggestion> {
        let indices = self.indices.read().expect("lock poisoned");
        indices.get(index_name)?.get(term).cloned()
    }

    fn has_index(&self, index_name: &str) -> bool {
        let indices = self.indices.read().expect("lock poisoned");
        indices.contains_key(index_name)
    }
}
