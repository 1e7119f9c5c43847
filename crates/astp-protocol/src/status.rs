//! Status codes reported in a create response.
//!
//! Every status has a fixed response key and a default message. Keys are part
//! of the wire protocol and must not change.

use serde::{Deserialize, Serialize};

/// How a status affects the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The request is rejected; no command is produced.
    Fatal,
    /// Recorded, but the request is still accepted.
    Warning,
    /// Final success marker.
    Ok,
    /// Raised after acceptance, while or after applying the mutation.
    Failure,
}

/// A reportable create status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateStatus {
    // Fatal validation errors
    QueryNameNotGiven,
    QueryNameTooLong,
    WeightNotGiven,
    WeightNotANumber,
    RequestNotMultipart,
    ImageWrongType,
    ImageGeometryTooBig,
    ImageFileTooLarge,

    // Non-fatal warnings
    KeyNotGiven,
    KeyTooLong,
    DefaultIndex,
    NoImage,
    ResultPending,

    // Success
    Ok,

    // Worker-side faults
    IndexWriteFailed,
    PipelineClosed,
    ResultAbandoned,
}

impl CreateStatus {
    /// The response key this status is reported under.
    pub fn key(self) -> &'static str {
        match self {
            Self::QueryNameNotGiven => "Error:queryNameNotGiven",
            Self::QueryNameTooLong => "Error:queryNameTooLong",
            Self::WeightNotGiven => "Error:WeightNotGiven",
            Self::WeightNotANumber => "Error:WeightNotANumber",
            Self::RequestNotMultipart => "Error:RequestNotMultipart",
            Self::ImageWrongType => "Error:ImageWrongType",
            Self::ImageGeometryTooBig => "Error:ImageGeometryTooBig",
            Self::ImageFileTooLarge => "Error:ImageFileTooLarge",
            Self::KeyNotGiven => "Warning:KeyNotGiven",
            Self::KeyTooLong => "Warning:KeyTooLong",
            Self::DefaultIndex => "Warning:DefaultIndex",
            Self::NoImage => "Warning:noImage",
            Self::ResultPending => "Warning:ResultPending",
            Self::Ok => "Status:OK",
            Self::IndexWriteFailed => "Error:IndexWriteFailed",
            Self::PipelineClosed => "Error:PipelineClosed",
            Self::ResultAbandoned => "Error:ResultAbandoned",
        }
    }

    /// The message reported when no more specific one is given.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::QueryNameNotGiven => "query name not given",
            Self::QueryNameTooLong => "query name too long",
            Self::WeightNotGiven => "weight not given",
            Self::WeightNotANumber => "weight not a number",
            Self::RequestNotMultipart => "request must be multipart",
            Self::ImageWrongType => "image wrong type",
            Self::ImageGeometryTooBig => "image geometry too big",
            Self::ImageFileTooLarge => "image file too large",
            Self::KeyNotGiven => "key not given",
            Self::KeyTooLong => "key too long",
            Self::DefaultIndex => "default index used",
            Self::NoImage => "No image inserted",
            Self::ResultPending => "mutation still pending",
            // The original protocol echoes the marker as its own value.
            Self::Ok => "Status:OK",
            Self::IndexWriteFailed => "index write failed",
            Self::PipelineClosed => "pipeline closed",
            Self::ResultAbandoned => "mutation result abandoned",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::QueryNameNotGiven
            | Self::QueryNameTooLong
            | Self::WeightNotGiven
            | Self::WeightNotANumber
            | Self::RequestNotMultipart
            | Self::ImageWrongType
            | Self::ImageGeometryTooBig
            | Self::ImageFileTooLarge => Severity::Fatal,
            Self::KeyNotGiven
            | Self::KeyTooLong
            | Self::DefaultIndex
            | Self::NoImage
            | Self::ResultPending => Severity::Warning,
            Self::Ok => Severity::Ok,
            Self::IndexWriteFailed | Self::PipelineClosed | Self::ResultAbandoned => {
                Severity::Failure
            }
        }
    }

    /// Look a status up by its response key.
    pub fn from_key(key: &str) -> Option<Self> {
        ALL.iter().copied().find(|status| status.key() == key)
    }
}

const ALL: &[CreateStatus] = &[
    CreateStatus::QueryNameNotGiven,
    CreateStatus::QueryNameTooLong,
    CreateStatus::WeightNotGiven,
    CreateStatus::WeightNotANumber,
    CreateStatus::RequestNotMultipart,
    CreateStatus::ImageWrongType,
    CreateStatus::ImageGeometryTooBig,
    CreateStatus::ImageFileTooLarge,
    CreateStatus::KeyNotGiven,
    CreateStatus::KeyTooLong,
    CreateStatus::DefaultIndex,
    CreateStatus::NoImage,
    CreateStatus::ResultPending,
    CreateStatus::Ok,
    CreateStatus::IndexWriteFailed,
    CreateStatus::PipelineClosed,
    CreateStatus::ResultAbandoned,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys.len(), ALL.len());
    }

    #[test]
    fn from_key_finds_every_status() {
        for status in ALL {
            assert_eq!(CreateStatus::from_key(status.key()), Some(*status));
        }
        assert_eq!(CreateStatus::from_key("Error:unknown"), None);
    }

    #[test]
    fn wire_keys_match_protocol() {
        let cases = vec![
            (CreateStatus::QueryNameNotGiven, "Error:queryNameNotGiven"),
            (CreateStatus::QueryNameTooLong, "Error:queryNameTooLong"),
            (CreateStatus::WeightNotGiven, "Error:WeightNotGiven"),
            (CreateStatus::WeightNotANumber, "Error:WeightNotANumber"),
            (CreateStatus::KeyNotGiven, "Warning:KeyNotGiven"),
            (CreateStatus::DefaultIndex, "Warning:DefaultIndex"),
            (CreateStatus::NoImage, "Warning:noImage"),
            (CreateStatus::Ok, "Status:OK"),
        ];
        for (status, key) in cases {
            assert_eq!(status.key(), key, "wrong key for {:?}", status);
        }
    }

    #[test]
    fn severities() {
        assert_eq!(CreateStatus::WeightNotANumber.severity(), Severity::Fatal);
        assert_eq!(CreateStatus::ImageFileTooLarge.severity(), Severity::Fatal);
        assert_eq!(CreateStatus::KeyTooLong.severity(), Severity::Warning);
        assert_eq!(CreateStatus::Ok.severity(), Severity::Ok);
        assert_eq!(CreateStatus::IndexWriteFailed.severity(), Severity::Failure);
    }

    #[test]
    fn no_image_message_matches_protocol() {
        assert_eq!(CreateStatus::NoImage.default_message(), "No image inserted");
    }
}
