//! Field validation for create requests.
//!
//! Checks run field by field: term, weight, key, index name, image. Every
//! field is checked and recorded independently, so one request can report
//! several problems at once. Only the image checks short-circuit among
//! themselves (type, then geometry, then file size).

use crate::command::{CreateCommand, SuggestionImage};
use astp_protocol::{CreateForm, CreateResponse, CreateStatus, ImageAttachment, ProtocolConstants};
use tracing::debug;

/// Outcome of validating one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub response: CreateResponse,
    /// Present only if no fatal error was recorded.
    pub command: Option<CreateCommand>,
}

impl Validated {
    fn rejected(response: CreateResponse) -> Self {
        Self {
            response,
            command: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.command.is_some()
    }
}

/// Validate a parsed create request.
pub fn validate(form: CreateForm, constants: &ProtocolConstants) -> Validated {
    let mut response = CreateResponse::new();

    if !form.multipart {
        response.add_error(CreateStatus::RequestNotMultipart);
        debug!("create request rejected: not multipart");
        return Validated::rejected(response);
    }

    let CreateForm {
        term,
        key,
        weight,
        index_name,
        image,
        ..
    } = form;

    let term = check_term(non_empty(term), constants, &mut response);
    let weight = check_weight(non_empty(weight), &mut response);
    let key = check_key(non_empty(key), constants, &mut response);
    let index_name = check_index(non_empty(index_name), constants, &mut response);
    let image = check_image(image, constants, &mut response);

    if response.is_rejected() {
        debug!(
            statuses = ?response.statuses().collect::<Vec<_>>(),
            "create request rejected"
        );
        return Validated::rejected(response);
    }

    match (term, weight, image) {
        (Some(term), Some(weight), Ok(image)) => {
            response.mark_ok();
            Validated {
                command: Some(CreateCommand::new(key, term, weight, index_name, image)),
                response,
            }
        }
        // Unreachable: every missing piece records a fatal status above.
        _ => Validated::rejected(response),
    }
}

/// Empty submitted values count as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_term(
    term: Option<String>,
    constants: &ProtocolConstants,
    response: &mut CreateResponse,
) -> Option<String> {
    let Some(term) = term else {
        response.add_error(CreateStatus::QueryNameNotGiven);
        return None;
    };
    if char_len(&term) > constants.max_suggestion_length {
        response.add_error(CreateStatus::QueryNameTooLong);
        return None;
    }
    response.set_term_echo(&term);
    Some(term)
}

fn check_weight(weight: Option<String>, response: &mut CreateResponse) -> Option<f64> {
    let Some(weight) = weight else {
        response.add_error(CreateStatus::WeightNotGiven);
        return None;
    };
    match weight.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            response.add_error(CreateStatus::WeightNotANumber);
            None
        }
    }
}

/// Too-long keys are kept as submitted; only the warning is recorded.
fn check_key(
    key: Option<String>,
    constants: &ProtocolConstants,
    response: &mut CreateResponse,
) -> Option<String> {
    match key {
        None => {
            response.add_warning(CreateStatus::KeyNotGiven);
            None
        }
        Some(key) => {
            if char_len(&key) > constants.max_key_length {
                response.add_warning(CreateStatus::KeyTooLong);
            }
            Some(key)
        }
    }
}

fn check_index(
    index_name: Option<String>,
    constants: &ProtocolConstants,
    response: &mut CreateResponse,
) -> String {
    index_name.unwrap_or_else(|| {
        response.add_warning(CreateStatus::DefaultIndex);
        constants.default_index_name.clone()
    })
}

/// `Err(())` means a fatal image status was recorded.
fn check_image(
    image: Option<ImageAttachment>,
    constants: &ProtocolConstants,
    response: &mut CreateResponse,
) -> Result<Option<SuggestionImage>, ()> {
    let Some(image) = image else {
        response.add_warning(CreateStatus::NoImage);
        return Ok(None);
    };

    let failure = if !constants.accepts_image_type(&image.media_type) {
        Some(CreateStatus::ImageWrongType)
    } else if image.width > constants.max_image_width || image.height > constants.max_image_height
    {
        Some(CreateStatus::ImageGeometryTooBig)
    } else if image.size() > constants.max_image_file_length {
        Some(CreateStatus::ImageFileTooLarge)
    } else {
        None
    };

    match failure {
        Some(status) => {
            response.add_error(status);
            Err(())
        }
        None => Ok(Some(image.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astp_protocol::{INDEX_FIELD, KEY_FIELD, TERM_FIELD, WEIGHT_FIELD};

    const VALID_KEY: &str = "abc";
    const VALID_TERM: &str = "hello world";
    const VALID_WEIGHT: &str = "3.5";
    const VALID_INDEX: &str = "testIndex";
    const DEFAULT_INDEX: &str = "defaultIndex";

    fn constants() -> ProtocolConstants {
        ProtocolConstants::with_default_index(DEFAULT_INDEX)
    }

    fn form(
        key: Option<&str>,
        term: Option<&str>,
        weight: Option<&str>,
        index: Option<&str>,
        image: Option<ImageAttachment>,
    ) -> CreateForm {
        let mut form = CreateForm::multipart();
        for (name, value) in [
            (KEY_FIELD, key),
            (TERM_FIELD, term),
            (WEIGHT_FIELD, weight),
            (INDEX_FIELD, index),
        ] {
            if let Some(value) = value {
                form = form.with_field(name, value);
            }
        }
        if let Some(image) = image {
            form = form.with_image(image);
        }
        form
    }

    fn jpeg(width: u32, height: u32, size: usize) -> ImageAttachment {
        ImageAttachment::new("image/jpeg", width, height, vec![0xFF; size])
    }

    fn process(form: CreateForm) -> Validated {
        validate(form, &constants())
    }

    #[test]
    fn missing_term_is_fatal() {
        let result = process(form(
            Some(VALID_KEY),
            None,
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            None,
        ));

        assert!(result.command.is_none());
        assert_eq!(
            result.response.get("Error:queryNameNotGiven"),
            Some("query name not given")
        );
        let fatal: Vec<_> = result
            .response
            .statuses()
            .filter(|s| s.severity() == astp_protocol::Severity::Fatal)
            .collect();
        assert_eq!(fatal, vec![CreateStatus::QueryNameNotGiven]);
        assert!(result.response.term_echo().is_none());
    }

    #[test]
    fn empty_term_counts_as_missing() {
        let result = process(form(None, Some(""), Some("1"), None, None));
        assert!(result
            .response
            .contains_status(CreateStatus::QueryNameNotGiven));
        assert!(result.command.is_none());
    }

    #[test]
    fn term_too_long_is_fatal() {
        let term = "a".repeat(81);
        let result = process(form(
            Some(VALID_KEY),
            Some(&term),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            None,
        ));

        assert!(result.command.is_none());
        assert_eq!(
            result.response.get("Error:queryNameTooLong"),
            Some("query name too long")
        );
    }

    #[test]
    fn term_limit_counts_characters_not_bytes() {
        let term = "ä".repeat(80);
        let result = process(form(None, Some(&term), Some("1"), None, None));
        assert!(result.is_accepted());
        assert_eq!(result.command.unwrap().term(), term);
    }

    #[test]
    fn missing_weight_is_fatal() {
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            None,
            Some(VALID_INDEX),
            None,
        ));
        assert!(result.command.is_none());
        assert_eq!(
            result.response.get("Error:WeightNotGiven"),
            Some("weight not given")
        );
    }

    #[test]
    fn non_numeric_weight_is_fatal() {
        for weight in ["abc", "1,5", "NaN", "inf"] {
            let result = process(form(
                Some(VALID_KEY),
                Some(VALID_TERM),
                Some(weight),
                Some(VALID_INDEX),
                None,
            ));
            assert!(result.command.is_none(), "accepted weight {:?}", weight);
            assert_eq!(
                result.response.get("Error:WeightNotANumber"),
                Some("weight not a number")
            );
        }
    }

    #[test]
    fn integer_and_negative_weights_parse() {
        let result = process(form(None, Some(VALID_TERM), Some("-12"), None, None));
        assert_eq!(result.command.unwrap().weight(), -12.0);
    }

    #[test]
    fn missing_key_is_a_warning() {
        let result = process(form(
            None,
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            None,
        ));

        let command = result.command.expect("command should be produced");
        assert_eq!(command.key(), None);
        assert_eq!(
            result.response.get("Warning:KeyNotGiven"),
            Some("key not given")
        );
        assert!(result.response.contains("Status:OK"));
    }

    #[test]
    fn too_long_key_is_kept_with_warning() {
        let key = "k".repeat(65);
        let result = process(form(
            Some(&key),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            None,
        ));

        assert!(result.response.contains_status(CreateStatus::KeyTooLong));
        assert_eq!(result.command.unwrap().key(), Some(key.as_str()));
    }

    #[test]
    fn missing_index_uses_default() {
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            None,
            None,
        ));

        assert_eq!(
            result.response.get("Warning:DefaultIndex"),
            Some("default index used")
        );
        assert_eq!(result.command.unwrap().index_name(), DEFAULT_INDEX);
    }

    #[test]
    fn full_form_without_image() {
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            None,
        ));

        let command = result.command.as_ref().unwrap();
        assert_eq!(command.key(), Some(VALID_KEY));
        assert_eq!(command.term(), VALID_TERM);
        assert_eq!(command.weight().to_string(), VALID_WEIGHT);
        assert_eq!(command.index_name(), VALID_INDEX);
        assert!(command.image().is_none());

        assert_eq!(
            result.response.to_json().unwrap(),
            r#"{"term":"hello world","Warning:noImage":"No image inserted","Status:OK":"Status:OK"}"#
        );
    }

    #[test]
    fn full_form_with_image() {
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            Some(jpeg(64, 64, 2_048)),
        ));

        let command = result.command.as_ref().expect("command should be produced");
        let image = command.image().unwrap();
        assert_eq!((image.width, image.height), (64, 64));
        assert_eq!(image.size(), 2_048);
        assert!(!result.response.contains_status(CreateStatus::NoImage));
        assert_eq!(result.response.get("Status:OK"), Some("Status:OK"));
    }

    #[test]
    fn image_too_wide_is_fatal() {
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            Some(jpeg(65, 10, 100)),
        ));
        assert!(result.command.is_none());
        assert!(result
            .response
            .contains_status(CreateStatus::ImageGeometryTooBig));
    }

    #[test]
    fn image_too_high_is_fatal() {
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            Some(jpeg(10, 65, 100)),
        ));
        assert!(result.command.is_none());
        assert!(result
            .response
            .contains_status(CreateStatus::ImageGeometryTooBig));
    }

    #[test]
    fn image_wrong_type_is_fatal_and_checked_first() {
        let png = ImageAttachment::new("image/png", 500, 500, vec![0; 10]);
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            Some(png),
        ));

        assert!(result.command.is_none());
        assert!(result.response.contains_status(CreateStatus::ImageWrongType));
        assert!(!result
            .response
            .contains_status(CreateStatus::ImageGeometryTooBig));
    }

    #[test]
    fn image_file_too_large_is_fatal() {
        let result = process(form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            Some(jpeg(64, 64, 3_000_001)),
        ));
        assert!(result.command.is_none());
        assert_eq!(
            result.response.get("Error:ImageFileTooLarge"),
            Some("image file too large")
        );
    }

    #[test]
    fn image_at_size_limit_is_accepted() {
        let result = process(form(
            None,
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            None,
            Some(jpeg(1, 1, 3_000_000)),
        ));
        assert!(result.is_accepted());
    }

    #[test]
    fn not_multipart_short_circuits() {
        let mut not_multipart = form(
            Some(VALID_KEY),
            Some(VALID_TERM),
            Some(VALID_WEIGHT),
            Some(VALID_INDEX),
            None,
        );
        not_multipart.multipart = false;

        let result = process(not_multipart);
        assert!(result.command.is_none());
        assert_eq!(result.response.len(), 1);
        assert_eq!(
            result.response.get("Error:RequestNotMultipart"),
            Some("request must be multipart")
        );
    }

    #[test]
    fn orthogonal_errors_are_all_recorded() {
        let result = process(form(None, None, Some("x"), None, None));

        assert!(result.command.is_none());
        let statuses: Vec<_> = result.response.statuses().collect();
        assert_eq!(
            statuses,
            vec![
                CreateStatus::QueryNameNotGiven,
                CreateStatus::WeightNotANumber,
                CreateStatus::KeyNotGiven,
                CreateStatus::DefaultIndex,
                CreateStatus::NoImage,
            ]
        );
        assert!(!result.response.contains("Status:OK"));
    }

    #[test]
    fn warnings_survive_success() {
        let result = process(form(None, Some(VALID_TERM), Some("1"), None, None));

        let statuses: Vec<_> = result.response.statuses().collect();
        assert_eq!(
            statuses,
            vec![
                CreateStatus::KeyNotGiven,
                CreateStatus::DefaultIndex,
                CreateStatus::NoImage,
                CreateStatus::Ok,
            ]
        );
    }
}
