//! Typed document trait

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::collection::Collection;
use crate::error::DocumentError;
use crate::id::DocumentId;

/// A record stored in one specific collection
///
/// Decoding validates the raw body against the record's shape before any
/// mutation touches it; encoding produces the body that gets persisted.
pub trait Document: Serialize + DeserializeOwned + Clone + std::fmt::Debug {
    /// Collection this record lives in
    const COLLECTION: Collection;

    /// Unique key
    fn id(&self) -> &DocumentId;

    /// Human readable name used in audit output
    fn label(&self) -> &str {
        self.id().as_str()
    }

    /// Decode a raw document
    ///
    /// # Errors
    /// Returns `DocumentError::Decode` if the body does not match the record
    fn decode(raw: Value) -> Result<Self, DocumentError> {
        let key = DocumentId::from_document(&raw)?;
        serde_json::from_value(raw).map_err(|e| DocumentError::decode(Self::COLLECTION, key.as_str(), e))
    }

    /// Encode into a raw document
    ///
    /// # Errors
    /// Returns `DocumentError::Encode` if serialization fails
    fn encode(&self) -> Result<Value, DocumentError> {
        serde_json::to_value(self)
            .map_err(|e| DocumentError::encode(Self::COLLECTION, self.id().as_str(), e))
    }
}
