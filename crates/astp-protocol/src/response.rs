//! Create response builder.
//!
//! An append-only, order-preserving list of `(key, message)` entries. The
//! serialized form is a flat JSON object whose keys appear in exactly the order
//! they were added. Entries are never removed, and each key appears at most
//! once, since a JSON object cannot carry the same key twice.

use crate::constants::TERM_FIELD;
use crate::status::{CreateStatus, Severity};
use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single response entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEntry {
    pub key: String,
    pub message: String,
    /// `None` for the term echo and for keys this build does not know.
    pub status: Option<CreateStatus>,
}

/// Accumulated response for one create request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateResponse {
    entries: Vec<ResponseEntry>,
}

impl CreateResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo the accepted suggestion string under the `term` key.
    pub fn set_term_echo(&mut self, term: &str) {
        self.push(TERM_FIELD.to_string(), term.to_string(), None);
    }

    /// Record a fatal validation error with its default message.
    pub fn add_error(&mut self, status: CreateStatus) {
        debug_assert_eq!(status.severity(), Severity::Fatal);
        self.add(status);
    }

    /// Record a non-fatal warning with its default message.
    pub fn add_warning(&mut self, status: CreateStatus) {
        debug_assert_eq!(status.severity(), Severity::Warning);
        self.add(status);
    }

    /// Append the final success marker.
    pub fn mark_ok(&mut self) {
        self.add(CreateStatus::Ok);
    }

    /// Record a post-acceptance failure with a specific message.
    pub fn add_failure(&mut self, status: CreateStatus, message: impl Into<String>) {
        debug_assert_eq!(status.severity(), Severity::Failure);
        self.add_with_message(status, message);
    }

    /// Record any status with its default message.
    pub fn add(&mut self, status: CreateStatus) {
        self.add_with_message(status, status.default_message());
    }

    /// Record any status with a custom message.
    pub fn add_with_message(&mut self, status: CreateStatus, message: impl Into<String>) {
        self.push(status.key().to_string(), message.into(), Some(status));
    }

    fn push(&mut self, key: String, message: String, status: Option<CreateStatus>) {
        debug_assert!(!self.contains(&key), "duplicate response key: {}", key);
        self.entries.push(ResponseEntry {
            key,
            message,
            status,
        });
    }

    /// True if any fatal validation error was recorded.
    pub fn is_rejected(&self) -> bool {
        self.has_severity(Severity::Fatal)
    }

    /// True if a post-acceptance failure was recorded.
    pub fn has_failure(&self) -> bool {
        self.has_severity(Severity::Failure)
    }

    fn has_severity(&self, severity: Severity) -> bool {
        self.entries
            .iter()
            .filter_map(|e| e.status)
            .any(|s| s.severity() == severity)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn contains_status(&self, status: CreateStatus) -> bool {
        self.entries.iter().any(|e| e.status == Some(status))
    }

    /// Message of the first entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.message.as_str())
    }

    /// The echoed term, if any.
    pub fn term_echo(&self) -> Option<&str> {
        self.get(TERM_FIELD)
    }

    /// Statuses in the order they were recorded.
    pub fn statuses(&self) -> impl Iterator<Item = CreateStatus> + '_ {
        self.entries.iter().filter_map(|e| e.status)
    }

    pub fn entries(&self) -> &[ResponseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a JSON value (key order preserved).
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Serialize for CreateResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.message)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CreateResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ResponseVisitor)
    }
}

struct ResponseVisitor;

impl<'de> Visitor<'de> for ResponseVisitor {
    type Value = CreateResponse;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a flat object of status keys to messages")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut response = CreateResponse::new();
        while let Some((key, message)) = access.next_entry::<String, String>()? {
            if response.contains(&key) {
                return Err(A::Error::custom(format!("duplicate key `{}`", key)));
            }
            let status = CreateStatus::from_key(&key);
            response.push(key, message, status);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate response key: Warning:noImage")]
    fn recording_a_key_twice_is_a_bug() {
        let mut response = CreateResponse::new();
        response.add_warning(CreateStatus::NoImage);
        response.add_warning(CreateStatus::NoImage);
    }

    #[test]
    fn from_json_rejects_duplicate_keys() {
        let err = CreateResponse::from_json(r#"{"Status:OK":"Status:OK","Status:OK":"again"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate key `Status:OK`"));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut response = CreateResponse::new();
        response.set_term_echo("hello world");
        response.add_warning(CreateStatus::NoImage);
        response.mark_ok();

        assert_eq!(
            response.to_json().unwrap(),
            r#"{"term":"hello world","Warning:noImage":"No image inserted","Status:OK":"Status:OK"}"#
        );
    }

    #[test]
    fn order_survives_value_conversion() {
        let mut response = CreateResponse::new();
        response.add_warning(CreateStatus::KeyNotGiven);
        response.add_warning(CreateStatus::DefaultIndex);
        response.set_term_echo("abc");

        let value = response.to_value().unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Warning:KeyNotGiven", "Warning:DefaultIndex", "term"]);
    }

    #[test]
    fn empty_response_serializes_to_empty_object() {
        assert_eq!(CreateResponse::new().to_json().unwrap(), "{}");
    }

    #[test]
    fn rejection_tracks_fatal_entries_only() {
        let mut response = CreateResponse::new();
        response.add_warning(CreateStatus::KeyNotGiven);
        assert!(!response.is_rejected());

        response.add_error(CreateStatus::WeightNotGiven);
        assert!(response.is_rejected());
        assert!(!response.has_failure());
    }

    #[test]
    fn failure_is_appended_without_removing_ok() {
        let mut response = CreateResponse::new();
        response.mark_ok();
        response.add_failure(CreateStatus::IndexWriteFailed, "unknown index: nope");

        assert!(response.has_failure());
        assert_eq!(response.get("Status:OK"), Some("Status:OK"));
        assert_eq!(
            response.get("Error:IndexWriteFailed"),
            Some("unknown index: nope")
        );
        assert_eq!(response.len(), 2);
    }

    #[test]
    fn roundtrip_keeps_statuses_and_order() {
        let mut response = CreateResponse::new();
        response.set_term_echo("t");
        response.add_warning(CreateStatus::KeyTooLong);
        response.mark_ok();

        let parsed = CreateResponse::from_json(&response.to_json().unwrap()).unwrap();
        assert_eq!(parsed, response);
        assert_eq!(parsed.term_echo(), Some("t"));
        assert_eq!(
            parsed.statuses().collect::<Vec<_>>(),
            vec![CreateStatus::KeyTooLong, CreateStatus::Ok]
        );
    }
}
