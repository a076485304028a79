//! In-memory store

use cpt_document::{Collection, DocumentId};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::store::{DocumentStore, UpsertOutcome};

/// Collections held in memory, scanned in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<Collection, IndexMap<DocumentId, Value>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents to a collection
    ///
    /// # Errors
    /// - `StoreError::Document` if a document has no usable `_id`
    /// - `StoreError::DuplicateKey` if two documents share a key
    pub fn with_documents(
        mut self,
        collection: Collection,
        documents: impl IntoIterator<Item = Value>,
    ) -> Result<Self, StoreError> {
        for document in documents {
            self.load(collection, document)?;
        }
        Ok(self)
    }

    /// Add a document read from storage; a repeated key is an error
    pub(crate) fn load(&mut self, collection: Collection, document: Value) -> Result<(), StoreError> {
        let key = DocumentId::from_document(&document)?;
        let docs = self.collections.entry(collection).or_default();
        if docs.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                collection,
                key: key.to_string(),
            });
        }
        docs.insert(key, document);
        Ok(())
    }

    /// Documents of a collection, in scan order
    pub fn documents(&self, collection: Collection) -> impl Iterator<Item = &Value> {
        self.collections
            .get(&collection)
            .into_iter()
            .flat_map(IndexMap::values)
    }

    /// Number of documents in a collection
    #[inline]
    #[must_use]
    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, IndexMap::len)
    }

    /// Whether a collection has no documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

impl DocumentStore for MemoryStore {
    fn keys(&self, collection: Collection) -> Result<Vec<DocumentId>, StoreError> {
        Ok(self
            .collections
            .get(&collection)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn get(&self, collection: Collection, key: &DocumentId) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .get(&collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    fn contains(&self, collection: Collection, key: &DocumentId) -> Result<bool, StoreError> {
        Ok(self
            .collections
            .get(&collection)
            .is_some_and(|docs| docs.contains_key(key)))
    }

    fn upsert(&mut self, collection: Collection, document: Value) -> Result<UpsertOutcome, StoreError> {
        let key = DocumentId::from_document(&document)?;
        let previous = self
            .collections
            .entry(collection)
            .or_default()
            .insert(key, document);
        Ok(match previous {
            Some(_) => UpsertOutcome::Replaced,
            None => UpsertOutcome::Inserted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upsert_replaces_in_place() {
        let mut store = MemoryStore::new()
            .with_documents(
                Collection::TreeNode,
                [json!({"_id": "a"}), json!({"_id": "b"}), json!({"_id": "c"})],
            )
            .unwrap();

        let outcome = store
            .upsert(Collection::TreeNode, json!({"_id": "b", "name": "B"}))
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Replaced);
        assert_eq!(store.keys(Collection::TreeNode).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(
            store.get(Collection::TreeNode, &"b".into()).unwrap(),
            Some(json!({"_id": "b", "name": "B"}))
        );
    }

    #[test]
    fn upsert_inserts_new_key() {
        let mut store = MemoryStore::new();
        let outcome = store.upsert(Collection::User, json!({"_id": "admin"})).unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(store.len(Collection::User), 1);
        assert!(store.is_empty(Collection::TreeNode));
    }

    #[test]
    fn insert_refuses_existing_key() {
        let mut store = MemoryStore::new()
            .with_documents(Collection::User, [json!({"_id": "admin", "role": "ADMIN"})])
            .unwrap();
        let err = store
            .insert(Collection::User, json!({"_id": "admin", "role": "READ_ONLY"}))
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        assert_eq!(store.get(Collection::User, &"admin".into()).unwrap().unwrap()["role"], "ADMIN");
    }

    #[test]
    fn duplicate_keys_rejected_on_load() {
        let result = MemoryStore::new()
            .with_documents(Collection::TreeNode, [json!({"_id": "a"}), json!({"_id": "a"})]);
        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
    }

    #[test]
    fn keys_are_a_snapshot() {
        let mut store = MemoryStore::new()
            .with_documents(Collection::TreeNode, [json!({"_id": "a"})])
            .unwrap();
        let keys = store.keys(Collection::TreeNode).unwrap();
        store.upsert(Collection::TreeNode, json!({"_id": "z"})).unwrap();
        assert_eq!(keys, vec!["a"]);
    }

    #[test]
    fn object_id_and_text_keys_are_distinct() {
        let mut store = MemoryStore::new()
            .with_documents(Collection::TreeNodeVersion, [json!({"_id": "x", "n": 1})])
            .unwrap();

        let outcome = store
            .upsert(Collection::TreeNodeVersion, json!({"_id": {"$oid": "x"}, "n": 2}))
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(store.len(Collection::TreeNodeVersion), 2);
        assert_eq!(store.get(Collection::TreeNodeVersion, &"x".into()).unwrap().unwrap()["n"], 1);
        let oid = DocumentId::ObjectId("x".into());
        assert_eq!(store.get(Collection::TreeNodeVersion, &oid).unwrap().unwrap()["n"], 2);
    }
}
