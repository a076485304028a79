//! Object history records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::document::Document;
use crate::id::DocumentId;
use crate::Fields;

/// `_class` the application's repositories write for object histories
pub(crate) const OBJECT_HISTORY_CLASS: &str =
    "com.att.eg.cptl.capacityplanning.backendcommon.commonmodel.model.ObjectHistory";

/// Version log of one object, keyed `history_<Type>_<objectId>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectHistory {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(rename = "objectId")]
    pub object_id: String,
    /// Simple type name of the tracked object, e.g. `TreeNode`
    #[serde(rename = "type")]
    pub object_type: String,
    /// Snapshots ordered by increasing `versionId`
    #[serde(rename = "previousVersions", default)]
    pub previous_versions: Vec<ObjectVersion>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl ObjectHistory {
    /// Key of the history tracking `object_id` of type `object_type`
    #[must_use]
    pub fn key_for(object_type: &str, object_id: &str) -> String {
        format!("history_{object_type}_{object_id}")
    }

    /// Start a history with a single snapshot
    #[must_use]
    pub fn first_version(object_type: &str, object_id: &str, version: ObjectVersion) -> Self {
        Self {
            id: DocumentId::text(Self::key_for(object_type, object_id)),
            class: Some(OBJECT_HISTORY_CLASS.to_string()),
            object_id: object_id.to_string(),
            object_type: object_type.to_string(),
            previous_versions: vec![version],
            extra: Fields::new(),
        }
    }

    /// `versionId` of the last recorded snapshot
    #[inline]
    #[must_use]
    pub fn latest_version_id(&self) -> Option<i64> {
        self.previous_versions.last().map(|v| v.version_id)
    }

    /// Whether snapshots are ordered by strictly increasing `versionId`
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.previous_versions
            .windows(2)
            .all(|pair| pair[0].version_id < pair[1].version_id)
    }
}

impl Document for ObjectHistory {
    const COLLECTION: Collection = Collection::ObjectHistory;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

/// One snapshot of a tracked object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectVersion {
    #[serde(rename = "versionId")]
    pub version_id: i64,
    /// ISO-8601 string, or `{"$date": ..}` in exports of older releases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    /// Snapshot of the object at this version
    #[serde(default)]
    pub object: Value,
    #[serde(flatten)]
    pub extra: Fields,
}

impl ObjectVersion {
    /// Snapshot recorded by `user_id` at `timestamp`
    #[must_use]
    pub fn new(version_id: i64, timestamp: impl Into<String>, user_id: impl Into<String>, object: Value) -> Self {
        Self {
            version_id,
            timestamp: Some(Value::String(timestamp.into())),
            user_id: Some(Value::String(user_id.into())),
            object,
            extra: Fields::new(),
        }
    }
}
