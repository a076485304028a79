//! Store trait
//!
//! Documents cross this seam as raw JSON; typed access goes through
//! [`DocumentStoreExt`], which decodes on read and encodes on write.

use cpt_document::{Collection, Document, DocumentId};
use serde_json::Value;

use crate::error::StoreError;

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No document had this key
    Inserted,
    /// An existing document was replaced
    Replaced,
}

/// Keyed document collections
pub trait DocumentStore {
    /// Keys of every document in the collection, in scan order
    ///
    /// The returned list is a snapshot; later writes do not change it.
    ///
    /// # Errors
    /// Store-specific read failures
    fn keys(&self, collection: Collection) -> Result<Vec<DocumentId>, StoreError>;

    /// Document stored under `key`
    ///
    /// # Errors
    /// Store-specific read failures
    fn get(&self, collection: Collection, key: &DocumentId) -> Result<Option<Value>, StoreError>;

    /// Whether a document with `key` exists
    ///
    /// # Errors
    /// Store-specific read failures
    fn contains(&self, collection: Collection, key: &DocumentId) -> Result<bool, StoreError> {
        Ok(self.get(collection, key)?.is_some())
    }

    /// Replace the document with the same `_id`, or insert it
    ///
    /// # Errors
    /// - `StoreError::Document` if the document has no usable `_id`
    /// - Store-specific write failures
    fn upsert(&mut self, collection: Collection, document: Value) -> Result<UpsertOutcome, StoreError>;

    /// Insert a document whose `_id` must not exist yet
    ///
    /// # Errors
    /// - `StoreError::AlreadyExists` if the key is taken
    /// - Any error of [`DocumentStore::upsert`]
    fn insert(&mut self, collection: Collection, document: Value) -> Result<(), StoreError> {
        let key = DocumentId::from_document(&document)?;
        if self.contains(collection, &key)? {
            return Err(StoreError::AlreadyExists {
                collection,
                key: key.to_string(),
            });
        }
        self.upsert(collection, document).map(|_| ())
    }

    /// Make every write since the last flush durable
    ///
    /// Writes that are never flushed may be lost; an aborted run relies on
    /// this to leave durable state untouched.
    ///
    /// # Errors
    /// Store-specific write failures
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Typed access on top of any [`DocumentStore`]
pub trait DocumentStoreExt: DocumentStore {
    /// Load and decode a record
    ///
    /// # Errors
    /// - `StoreError::Document` if the stored body does not decode
    /// - Store-specific read failures
    fn load<D: Document>(&self, key: &DocumentId) -> Result<Option<D>, StoreError> {
        match self.get(D::COLLECTION, key)? {
            Some(raw) => Ok(Some(D::decode(raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and upsert a record
    ///
    /// # Errors
    /// Any error of [`DocumentStore::upsert`]
    fn save<D: Document>(&mut self, document: &D) -> Result<UpsertOutcome, StoreError> {
        let raw = document.encode()?;
        self.upsert(D::COLLECTION, raw)
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}
