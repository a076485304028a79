//! Error types for the document model
//!
//! Covers:
//! - Documents without a usable `_id`
//! - Documents whose shape does not match their collection's record
//! - Records that cannot be written back

use crate::collection::Collection;

/// Errors raised while decoding or encoding documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document body is not a JSON object
    #[error("document is not an object")]
    NotAnObject,

    /// Document has no `_id` field
    #[error("document has no _id")]
    MissingId,

    /// `_id` is neither a string nor an ObjectId
    #[error("unsupported _id value: {0}")]
    InvalidId(String),

    /// Unknown collection name
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// Document shape does not match the collection's record
    #[error("cannot decode {collection} document {key}: {source}")]
    Decode {
        collection: Collection,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Record could not be serialized
    #[error("cannot encode {collection} document {key}: {source}")]
    Encode {
        collection: Collection,
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DocumentError {
    /// Create decode error for a document key
    pub fn decode(collection: Collection, key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            collection,
            key: key.into(),
            source,
        }
    }

    /// Create encode error for a document key
    pub fn encode(collection: Collection, key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            collection,
            key: key.into(),
            source,
        }
    }
}
