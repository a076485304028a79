//! Tree node version numbers from their object history

use cpt_document::{Document, DocumentId, ObjectHistory, TreeNode};
use cpt_store::{DocumentStore, DocumentStoreExt};

use super::TREE_NODE_HISTORY_TYPE;
use crate::error::MigrationError;
use crate::runner::DocumentMigration;

/// Sets `version` to the `versionId` of the node's latest history entry
///
/// The history itself is only read. Nodes without a history are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddVersionNr;

impl AddVersionNr {
    fn latest_version(node: &TreeNode, store: &dyn DocumentStore) -> Result<Option<i64>, MigrationError> {
        let key = ObjectHistory::key_for(TREE_NODE_HISTORY_TYPE, node.id.as_str());
        let Some(history) = store.load::<ObjectHistory>(&DocumentId::text(key.as_str()))? else {
            return Ok(None);
        };
        match history.latest_version_id() {
            Some(version) => Ok(Some(version)),
            None => Err(MigrationError::precondition(
                TreeNode::COLLECTION,
                node.id.as_str(),
                format!("{key} has no previous versions"),
            )),
        }
    }
}

impl DocumentMigration for AddVersionNr {
    type Document = TreeNode;

    fn name(&self) -> &'static str {
        "add-version-nr"
    }

    fn should_migrate(&self, node: &TreeNode, store: &dyn DocumentStore) -> Result<bool, MigrationError> {
        Ok(Self::latest_version(node, store)?.is_some_and(|latest| node.version != Some(latest)))
    }

    fn apply(&self, mut node: TreeNode, store: &dyn DocumentStore) -> Result<TreeNode, MigrationError> {
        if let Some(latest) = Self::latest_version(&node, store)? {
            node.version = Some(latest);
        }
        Ok(node)
    }
}
