//! Stand-alone tree node versions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::document::Document;
use crate::id::DocumentId;
use crate::Fields;

/// One stored version of a tree node
///
/// Older releases recorded the author as `userId`; current releases use
/// `ownerId`. Either may hold a non-string value and is carried as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodeVersion {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(rename = "ownerId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Document for TreeNodeVersion {
    const COLLECTION: Collection = Collection::TreeNodeVersion;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}
