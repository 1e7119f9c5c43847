//! Field names and numeric limits of the create protocol.
//!
//! The `const` items are the bit-exact protocol values. [`ProtocolConstants`]
//! bundles them with the deployment-specific parts (default index name,
//! accepted image media types) into one immutable table that is built once at
//! startup and handed to the validator by reference.

// ============================================================================
// Form field names
// ============================================================================

/// Suggestion string field.
pub const TERM_FIELD: &str = "term";

/// Owning key field.
pub const KEY_FIELD: &str = "key";

/// Rank weight field.
pub const WEIGHT_FIELD: &str = "weight";

/// Target index field.
pub const INDEX_FIELD: &str = "indexName";

/// Image attachment field.
pub const IMAGE_FIELD: &str = "image";

/// Content type a create request must be submitted with.
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

// ============================================================================
// Limits
// ============================================================================

/// Maximum suggestion string length, in characters.
pub const MAX_SUGGESTION_LENGTH: usize = 80;

/// Maximum key length, in characters.
pub const MAX_KEY_LENGTH: usize = 64;

/// Maximum image width, in pixels.
pub const IMAGE_WIDTH: u32 = 64;

/// Maximum image height, in pixels.
pub const IMAGE_HEIGHT: u32 = 64;

/// Maximum image file length, in bytes.
pub const MAX_IMAGE_FILE_LENGTH: u64 = 3_000_000;

/// Default number of suggestions returned per query (read path).
pub const MAX_NUMBER_OF_SUGGESTIONS: usize = 7;

/// Index used when a request does not name one.
pub const DEFAULT_INDEX_NAME: &str = "generalIndex";

/// Image media types accepted unless configured otherwise.
pub const DEFAULT_IMAGE_TYPES: &[&str] = &["image/jpeg"];

/// Immutable protocol table shared by the validator and the response path.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolConstants {
    pub max_suggestion_length: usize,
    pub max_key_length: usize,
    pub max_image_width: u32,
    pub max_image_height: u32,
    pub max_image_file_length: u64,
    pub max_number_of_suggestions: usize,
    pub default_index_name: String,
    pub accepted_image_types: Vec<String>,
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self {
            max_suggestion_length: MAX_SUGGESTION_LENGTH,
            max_key_length: MAX_KEY_LENGTH,
            max_image_width: IMAGE_WIDTH,
            max_image_height: IMAGE_HEIGHT,
            max_image_file_length: MAX_IMAGE_FILE_LENGTH,
            max_number_of_suggestions: MAX_NUMBER_OF_SUGGESTIONS,
            default_index_name: DEFAULT_INDEX_NAME.to_string(),
            accepted_image_types: DEFAULT_IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ProtocolConstants {
    /// Protocol limits with a deployment-specific default index.
    pub fn with_default_index(default_index_name: impl Into<String>) -> Self {
        Self {
            default_index_name: default_index_name.into(),
            ..Self::default()
        }
    }

    /// Replace the accepted image media types.
    pub fn with_image_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_image_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `media_type` is an accepted image type (case-insensitive).
    pub fn accepts_image_type(&self, media_type: &str) -> bool {
        self.accepted_image_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type.trim()))
    }
}
