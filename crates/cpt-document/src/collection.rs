//! Collection names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DocumentError;

/// A collection of the capacity-planning database
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Collection {
    /// Application users (`user`)
    #[serde(rename = "user")]
    User,
    /// Hierarchical namespace of folders, models, simulations (`treeNode`)
    #[serde(rename = "treeNode")]
    TreeNode,
    /// Embedded version logs (`objectHistory`)
    #[serde(rename = "objectHistory")]
    ObjectHistory,
    /// Stand-alone node versions (`treeNodeVersion`)
    #[serde(rename = "treeNodeVersion")]
    TreeNodeVersion,
}

impl Collection {
    /// Every collection, in a stable order
    pub const ALL: [Collection; 4] = [
        Collection::User,
        Collection::TreeNode,
        Collection::ObjectHistory,
        Collection::TreeNodeVersion,
    ];

    /// Collection name on the wire
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Collection::User => "user",
            Collection::TreeNode => "treeNode",
            Collection::ObjectHistory => "objectHistory",
            Collection::TreeNodeVersion => "treeNodeVersion",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| DocumentError::UnknownCollection(s.to_string()))
    }
}
