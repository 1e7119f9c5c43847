//! Strongly-typed create request.
//!
//! The transport hands over loosely-typed parameters; [`CreateForm::from_params`]
//! is the single explicit parse step that turns them into typed optional
//! fields. Validation then works on this value, never on string-keyed lookups.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "content_type": "multipart/form-data",
//!   "fields": { "term": "hello", "weight": "3.5", "key": "abc", "indexName": "testIndex" },
//!   "files": { "image": { "media_type": "image/jpeg", "width": 32, "height": 32, "data": "<base64>" } }
//! }
//! ```

use crate::constants::{
    IMAGE_FIELD, INDEX_FIELD, KEY_FIELD, MULTIPART_CONTENT_TYPE, TERM_FIELD, WEIGHT_FIELD,
};
use base64::Engine;
use serde_json::{Map, Value};
use thiserror::Error;

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Errors raised while parsing transport parameters into a [`CreateForm`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("params must be an object")]
    NotAnObject,

    #[error("field '{0}' must be a string or a number")]
    InvalidField(String),

    #[error("'{0}' must be an object")]
    InvalidSection(&'static str),

    #[error("invalid image attachment: {0}")]
    InvalidImage(String),
}

/// Metadata and payload of an attached image.
///
/// Width and height are declared by the submitter; no decoding happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub media_type: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(media_type: impl Into<String>, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            width,
            height,
            data,
        }
    }

    /// File length in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn from_value(value: &Value) -> Result<Self, FormError> {
        let obj = value
            .as_object()
            .ok_or_else(|| FormError::InvalidImage("expected an object".to_string()))?;

        let media_type = obj
            .get("media_type")
            .and_then(Value::as_str)
            .ok_or_else(|| FormError::InvalidImage("media_type is required".to_string()))?;
        let width = dimension(obj, "width")?;
        let height = dimension(obj, "height")?;
        let data = obj
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| FormError::InvalidImage("data is required".to_string()))?;
        let data = BASE64
            .decode(data)
            .map_err(|e| FormError::InvalidImage(format!("data is not base64: {}", e)))?;

        Ok(Self::new(media_type, width, height, data))
    }

    fn to_value(&self) -> Value {
        serde_json::json!({
            "media_type": self.media_type,
            "width": self.width,
            "height": self.height,
            "data": BASE64.encode(&self.data),
        })
    }
}

fn dimension(obj: &Map<String, Value>, name: &str) -> Result<u32, FormError> {
    obj.get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| FormError::InvalidImage(format!("{} must be a non-negative integer", name)))
}

/// A parsed create request. Every field is optional; presence is checked by
/// the validator, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateForm {
    /// Whether the request was submitted as multipart form data.
    pub multipart: bool,
    pub term: Option<String>,
    pub key: Option<String>,
    pub weight: Option<String>,
    pub index_name: Option<String>,
    pub image: Option<ImageAttachment>,
}

impl CreateForm {
    /// An empty multipart form.
    pub fn multipart() -> Self {
        Self {
            multipart: true,
            ..Self::default()
        }
    }

    /// Set a named text field. Unknown names are ignored, like the form
    /// parser does.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_field(name, value.into());
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    fn set_field(&mut self, name: &str, value: String) {
        match name {
            TERM_FIELD => self.term = Some(value),
            KEY_FIELD => self.key = Some(value),
            WEIGHT_FIELD => self.weight = Some(value),
            INDEX_FIELD => self.index_name = Some(value),
            _ => {}
        }
    }

    /// Parse transport parameters.
    ///
    /// A missing or non-multipart `content_type` yields a form with
    /// `multipart == false`; rejecting it is the validator's job.
    pub fn from_params(params: &Value) -> Result<Self, FormError> {
        let obj = params.as_object().ok_or(FormError::NotAnObject)?;

        let multipart = obj
            .get("content_type")
            .and_then(Value::as_str)
            .map(is_multipart)
            .unwrap_or(false);

        let mut form = Self {
            multipart,
            ..Self::default()
        };

        if let Some(fields) = obj.get("fields") {
            let fields = fields
                .as_object()
                .ok_or(FormError::InvalidSection("fields"))?;
            for (name, value) in fields {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Null => continue,
                    _ => return Err(FormError::InvalidField(name.clone())),
                };
                form.set_field(name, text);
            }
        }

        if let Some(files) = obj.get("files") {
            let files = files.as_object().ok_or(FormError::InvalidSection("files"))?;
            if let Some(image) = files.get(IMAGE_FIELD).filter(|v| !v.is_null()) {
                form.image = Some(ImageAttachment::from_value(image)?);
            }
        }

        Ok(form)
    }

    /// Render the form as transport parameters (inverse of [`Self::from_params`]).
    pub fn to_params(&self) -> Value {
        let mut fields = Map::new();
        let named = [
            (TERM_FIELD, &self.term),
            (KEY_FIELD, &self.key),
            (WEIGHT_FIELD, &self.weight),
            (INDEX_FIELD, &self.index_name),
        ];
        for (name, value) in named {
            if let Some(value) = value {
                fields.insert(name.to_string(), Value::String(value.clone()));
            }
        }

        let mut files = Map::new();
        if let Some(image) = &self.image {
            files.insert(IMAGE_FIELD.to_string(), image.to_value());
        }

        let mut params = Map::new();
        if self.multipart {
            params.insert(
                "content_type".to_string(),
                Value::String(MULTIPART_CONTENT_TYPE.to_string()),
            );
        }
        params.insert("fields".to_string(), Value::Object(fields));
        params.insert("files".to_string(), Value::Object(files));
        Value::Object(params)
    }
}

/// `multipart/form-data`, optionally followed by parameters such as a boundary.
fn is_multipart(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case(MULTIPART_CONTENT_TYPE))
        .unwrap_or(false)
}
