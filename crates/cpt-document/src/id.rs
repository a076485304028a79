//! Document keys
//!
//! Most collections use string keys (`fc_root`, `history_TreeNode_fc_root`).
//! Documents created by the application's repositories may carry a Mongo
//! ObjectId instead, which exports as `{"$oid": "<hex>"}`. The two forms are
//! distinct keys even when their string values match, and each is written
//! back in the form it was read in.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::error::DocumentError;

/// Unique key of a document within its collection
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentId {
    /// Plain string key
    Text(String),
    /// ObjectId, stored as its hex string
    ObjectId(String),
}

impl DocumentId {
    /// Create a plain string key
    #[inline]
    pub fn text(key: impl Into<String>) -> Self {
        Self::Text(key.into())
    }

    /// Key used to address the document in a store
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::ObjectId(s) => s,
        }
    }

    /// Read the `_id` of a raw document
    ///
    /// # Errors
    /// - `DocumentError::NotAnObject` if the document is not a JSON object
    /// - `DocumentError::MissingId` if `_id` is absent
    /// - `DocumentError::InvalidId` if `_id` has an unsupported shape
    pub fn from_document(document: &Value) -> Result<Self, DocumentError> {
        let fields = document.as_object().ok_or(DocumentError::NotAnObject)?;
        let raw = fields.get("_id").ok_or(DocumentError::MissingId)?;
        Self::deserialize(raw).map_err(|_| DocumentError::InvalidId(raw.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Only plain string keys compare equal to a string
impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Self::Text(s) if s == other)
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Text(s) => IdRepr::Text(s.clone()),
            Self::ObjectId(s) => IdRepr::ObjectId { oid: s.clone() },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match IdRepr::deserialize(deserializer)? {
            IdRepr::Text(s) => Self::Text(s),
            IdRepr::ObjectId { oid } => Self::ObjectId(oid),
        })
    }
}
