//! Record payloads exchanged with the Data API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier the server assigns to a record.
///
/// Older servers send `recordId` as a string, newer ones as a number; both
/// are normalised to the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        string_or_number(deserializer).map(Self)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(value)| value))
}

/// A single record as returned by read and find operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "fieldData", default)]
    pub field_data: Map<String, Value>,
    #[serde(rename = "portalData", default)]
    pub portal_data: Map<String, Value>,
    #[serde(rename = "recordId")]
    pub record_id: RecordId,
    #[serde(rename = "modId", default, deserialize_with = "optional_string_or_number")]
    pub mod_id: Option<String>,
}

impl Record {
    /// Look up a field value by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.field_data.get(name)
    }
}

/// Acknowledgement body of write operations (edit, delete, set globals).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAck {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(rename = "recordId", default)]
    pub record_id: Option<RecordId>,
    #[serde(rename = "modId", default, deserialize_with = "optional_string_or_number")]
    pub mod_id: Option<String>,
}

/// Window into a record listing, passed through to the server untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// First record to return (the server counts from 1).
    pub offset: Option<u32>,
    /// Maximum number of records to return.
    pub range: Option<u32>,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u32, range: u32) -> Self {
        Self { offset: Some(offset), range: Some(range) }
    }

    /// Query parameters for the fields that are set.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(range) = self.range {
            pairs.push(("range", range.to_string()));
        }
        pairs
    }
}
