//! Capability attribute values.

use std::fmt;

use serde::Serialize;

/// A single typed capability attribute.
///
/// Serialized untagged for diagnostics output. There is no `Deserialize`:
/// a string that parses as a version could not be told apart from a
/// version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Long(i64),
    Version(semver::Version),
    List(Vec<String>),
    String(String),
}

impl AttributeValue {
    /// Returns the string payload, if this is a string attribute.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Long(n) => write!(f, "{n}"),
            Self::Version(v) => write!(f, "{v}"),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<semver::Version> for AttributeValue {
    fn from(value: semver::Version) -> Self {
        Self::Version(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}
