//! Values stored in a suggestion index.

use chrono::{DateTime, Utc};

/// Image kept with a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub media_type: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// A suggestion to insert or update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSuggestion {
    pub term: String,
    pub weight: f64,
    pub key: Option<String>,
    pub image: Option<StoredImage>,
}

impl NewSuggestion {
    pub fn new(term: impl Into<String>, weight: f64) -> Self {
        Self {
            term: term.into(),
            weight,
            key: None,
            image: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_image(mut self, image: StoredImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// A suggestion as held by an index.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub term: String,
    pub weight: f64,
    pub key: Option<String>,
    pub image: Option<StoredImage>,
    pub updated_at: DateTime<Utc>,
}

impl Suggestion {
    pub(crate) fn from_new(new: NewSuggestion) -> Self {
        Self {
            term: new.term,
            weight: new.weight,
            key: new.key,
            image: new.image,
            updated_at: Utc::now(),
        }
    }
}
