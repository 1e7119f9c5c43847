//! A store wrapper that records every write attempt.

use crate::memory::InMemoryIndexStore;
use crate::store::IndexStore;
use crate::types::{NewSuggestion, Suggestion};
use crate::IndexError;
use std::collections::HashSet;
use std::sync::Mutex;

/// One recorded insert call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInsert {
    pub index_name: String,
    pub term: String,
    pub weight: f64,
    pub succeeded: bool,
}

/// Delegates to an [`InMemoryIndexStore`] and records each insert in call
/// order. Indices can be marked as failing to inject write errors.
#[derive(Debug, Default)]
pub struct RecordingIndexStore {
    inner: InMemoryIndexStore,
    inserts: Mutex<Vec<RecordedInsert>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingIndexStore {
    pub fn new(inner: InMemoryIndexStore) -> Self {
        Self {
            inner,
            inserts: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Makes every insert into `index_name` fail with [`IndexError::Rejected`].
    pub fn fail_index(&self, index_name: &str) {
        self.failing
            .lock()
            .expect("lock poisoned")
            .insert(index_name.to_string());
    }

    /// All recorded inserts, in call order.
    pub fn inserts(&self) -> Vec<RecordedInsert> {
        self.inserts.lock().expect("lock poisoned").clone()
    }

    /// Terms of all recorded inserts, in call order.
    pub fn terms(&self) -> Vec<String> {
        self.inserts()
            .into_iter()
            .map(|insert| insert.term)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inserts.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inner(&self) -> &InMemoryIndexStore {
        &self.inner
    }
}

impl IndexStore for RecordingIndexStore {
    fn insert(&self, index_name: &str, suggestion: NewSuggestion) -> Result<(), IndexError> {
        let term = suggestion.term.clone();
        let weight = suggestion.weight;

        let failing = self
            .failing
            .lock()
            .expect("lock poisoned")
            .contains(index_name);
        let result = if failing {
            Err(IndexError::Rejected(format!("writes to {} disabled", index_name)))
        } else {
            self.inner.insert(index_name, suggestion)
        };

        self.inserts
            .lock()
            .expect("lock poisoned")
            .push(RecordedInsert {
                index_name: index_name.to_string(),
                term,
                weight,
                succeeded: result.is_ok(),
            });
        result
    }

    fn get(&self, index_name: &str, term: &str) -> Option<Suggestion> {
        self.inner.get(index_name, term)
    }

    fn has_index(&self, index_name: &str) -> bool {
        self.inner.has_index(index_name)
    }
}
