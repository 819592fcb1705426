//! Common types used throughout feedkit
//!
//! A schema-agnostic element type for JSON APIs whose items carry numeric
//! string identifiers (snowflake-style IDs such as `"109876543210"`).

use crate::paging::Element;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Entry ID
// ============================================================================

/// A numeric identifier transported as a string
///
/// Ordered numerically without parsing: a longer digit string is larger, and
/// equal-length strings compare lexicographically. IDs too large for `u64`
/// therefore still sort correctly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Create an ID from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// String form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for EntryId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for EntryId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self::from(number),
        })
    }
}

// ============================================================================
// Entry
// ============================================================================

/// A JSON object with an `id` field, kept otherwise untyped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier
    pub id: EntryId,

    /// All other fields
    #[serde(flatten)]
    pub fields: JsonObject,
}

impl Entry {
    /// Create an entry with no extra fields
    pub fn new(id: impl Into<EntryId>) -> Self {
        Self {
            id: id.into(),
            fields: JsonObject::new(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Get a field
    pub fn field(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }
}

impl Element for Entry {
    type Id = EntryId;

    fn id(&self) -> &EntryId {
        &self.id
    }
}
