//! The normalized unit of ingestion work.

use astp_protocol::ImageAttachment;

/// Image carried by an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionImage {
    pub media_type: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl SuggestionImage {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl From<ImageAttachment> for SuggestionImage {
    fn from(image: ImageAttachment) -> Self {
        Self {
            media_type: image.media_type,
            width: image.width,
            height: image.height,
            data: image.data,
        }
    }
}

/// A validated create request.
///
/// Only the validator constructs commands, so every instance has passed all
/// fatal-error checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCommand {
    key: Option<String>,
    term: String,
    weight: f64,
    index_name: String,
    image: Option<SuggestionImage>,
}

impl CreateCommand {
    pub(crate) fn new(
        key: Option<String>,
        term: String,
        weight: f64,
        index_name: String,
        image: Option<SuggestionImage>,
    ) -> Self {
        Self {
            key,
            term,
            weight,
            index_name,
            image,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The suggestion string.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn image(&self) -> Option<&SuggestionImage> {
        self.image.as_ref()
    }

    /// Split into owned parts for the index store.
    pub fn into_parts(self) -> (Option<String>, String, f64, String, Option<SuggestionImage>) {
        (self.key, self.term, self.weight, self.index_name, self.image)
    }
}
