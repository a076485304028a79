//! Legacy author field of tree node versions

use cpt_document::TreeNodeVersion;
use cpt_store::DocumentStore;

use crate::error::MigrationError;
use crate::runner::DocumentMigration;

/// Moves `userId` to `ownerId`
///
/// When a version carries both, the `userId` value wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameVersionOwner;

impl DocumentMigration for RenameVersionOwner {
    type Document = TreeNodeVersion;

    fn name(&self) -> &'static str {
        "rename-version-owner"
    }

    fn should_migrate(&self, version: &TreeNodeVersion, _store: &dyn DocumentStore) -> Result<bool, MigrationError> {
        Ok(version.user_id.is_some())
    }

    fn apply(&self, mut version: TreeNodeVersion, _store: &dyn DocumentStore) -> Result<TreeNodeVersion, MigrationError> {
        if let Some(owner) = version.user_id.take() {
            version.owner_id = Some(owner);
        }
        Ok(version)
    }
}
