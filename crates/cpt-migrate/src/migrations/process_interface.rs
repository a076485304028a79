//! Cached process interface descriptors on model nodes

use cpt_document::{Document, DocumentError, ProcessInterfaceDescription, TreeNode};
use cpt_store::DocumentStore;

use crate::error::MigrationError;
use crate::runner::DocumentMigration;

/// Attaches a `processInterface` descriptor to models that have content
#[derive(Debug, Clone, Copy, Default)]
pub struct AddProcessInterface;

impl DocumentMigration for AddProcessInterface {
    type Document = TreeNode;

    fn name(&self) -> &'static str {
        "add-process-interface"
    }

    fn should_migrate(&self, node: &TreeNode, _store: &dyn DocumentStore) -> Result<bool, MigrationError> {
        Ok(node.is_model() && node.has_content() && node.process_interface.is_none())
    }

    fn apply(&self, mut node: TreeNode, _store: &dyn DocumentStore) -> Result<TreeNode, MigrationError> {
        let descriptor = ProcessInterfaceDescription::for_model(&node);
        let value = serde_json::to_value(descriptor)
            .map_err(|e| DocumentError::encode(TreeNode::COLLECTION, node.id.as_str(), e))?;
        node.process_interface = Some(value);
        Ok(node)
    }
}

/// Drops the `processInterface` descriptor from models
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveProcessInterface;

impl DocumentMigration for RemoveProcessInterface {
    type Document = TreeNode;

    fn name(&self) -> &'static str {
        "remove-process-interface"
    }

    fn should_migrate(&self, node: &TreeNode, _store: &dyn DocumentStore) -> Result<bool, MigrationError> {
        Ok(node.is_model() && node.process_interface.is_some())
    }

    fn apply(&self, mut node: TreeNode, _store: &dyn DocumentStore) -> Result<TreeNode, MigrationError> {
        node.process_interface = None;
        Ok(node)
    }
}
