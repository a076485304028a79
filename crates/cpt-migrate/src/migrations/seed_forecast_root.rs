//! Seed the forecast tree root

use chrono::{DateTime, SecondsFormat, Utc};
use cpt_document::{
    AccessControlType, AccessRule, Document, DocumentId, Fields, NodeType, ObjectHistory, ObjectVersion, Permission,
    TreeNode, TREE_NODE_CLASS,
};

use super::TREE_NODE_HISTORY_TYPE;
use crate::error::MigrationError;
use crate::seed::{Seed, SeedDocument};

/// Key and name of the forecast tree root
pub const FORECAST_ROOT_KEY: &str = "fc_root";

/// Inserts the `fc_root` folder and its single-version history when absent
///
/// Both documents are checked independently, so a database holding only one
/// of them gets the other.
#[derive(Debug, Clone)]
pub struct SeedForecastRoot {
    timestamp: DateTime<Utc>,
    recorded_by: String,
}

impl SeedForecastRoot {
    /// Seed stamped with `recorded_by` at the current time
    #[must_use]
    pub fn new(recorded_by: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            recorded_by: recorded_by.into(),
        }
    }

    /// With a fixed history timestamp
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The root folder
    #[must_use]
    pub fn root(&self) -> TreeNode {
        TreeNode {
            id: DocumentId::text(FORECAST_ROOT_KEY),
            class: Some(TREE_NODE_CLASS.to_string()),
            name: Some(FORECAST_ROOT_KEY.to_string()),
            node_type: NodeType::Folder,
            ancestors: Some(Vec::new()),
            description: None,
            access_control: Some(AccessControlType::Advanced),
            acl: Some(vec![AccessRule::everyone(vec![Permission::Read, Permission::Create])]),
            content: None,
            process_interface: None,
            process_dependencies: None,
            version: None,
            extra: Fields::new(),
        }
    }

    /// History of the root holding `root` as version 1
    ///
    /// # Errors
    /// `MigrationError::Document` if the root cannot be encoded
    pub fn history(&self, root: &TreeNode) -> Result<ObjectHistory, MigrationError> {
        let snapshot = ObjectVersion::new(
            1,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.recorded_by.clone(),
            root.encode()?,
        );
        Ok(ObjectHistory::first_version(
            TREE_NODE_HISTORY_TYPE,
            root.id.as_str(),
            snapshot,
        ))
    }
}

impl Seed for SeedForecastRoot {
    fn name(&self) -> &'static str {
        "seed-forecast-root"
    }

    fn documents(&self) -> Result<Vec<SeedDocument>, MigrationError> {
        let root = self.root();
        let history = self.history(&root)?;
        Ok(vec![
            SeedDocument::from_record(&root)?,
            SeedDocument::from_record(&history)?,
        ])
    }
}
