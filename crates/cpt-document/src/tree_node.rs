//! Tree node records
//!
//! A tree node is an entry in the hierarchical namespace: a folder, a model,
//! a simulation. Only the fields maintenance tooling reads or writes are
//! modelled; graph content stays a JSON object owned by the application.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::collection::Collection;
use crate::document::Document;
use crate::id::DocumentId;
use crate::Fields;

/// `_class` the application's repositories write for tree nodes
pub const TREE_NODE_CLASS: &str =
    "com.att.eg.cptl.capacityplanning.backendcommon.commonmodel.model.treenode.TreeNode";

/// `objectType` of a process interface descriptor
pub const PROCESS_INTERFACE_DESCRIPTION: &str = "PROCESS_INTERFACE_DESCRIPTION";

/// Kind of tree node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "FOLDER")]
    Folder,
    #[serde(rename = "MODEL")]
    Model,
    #[serde(rename = "MODELTEMPLATE")]
    ModelTemplate,
    #[serde(rename = "SIMULATION")]
    Simulation,
    #[serde(rename = "SIMULATIONRESULT")]
    SimulationResult,
    #[serde(rename = "FC_SHEET")]
    ForecastSheet,
    #[serde(rename = "META")]
    Meta,
    /// Value written by a newer application release
    #[serde(untagged)]
    Other(String),
}

impl NodeType {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Folder => "FOLDER",
            NodeType::Model => "MODEL",
            NodeType::ModelTemplate => "MODELTEMPLATE",
            NodeType::Simulation => "SIMULATION",
            NodeType::SimulationResult => "SIMULATIONRESULT",
            NodeType::ForecastSheet => "FC_SHEET",
            NodeType::Meta => "META",
            NodeType::Other(s) => s,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access control mode of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessControlType {
    #[serde(rename = "PRIVATE")]
    Private,
    #[serde(rename = "PUBLIC_READ_ONLY")]
    PublicReadOnly,
    #[serde(rename = "PUBLIC_READ_WRITE")]
    PublicReadWrite,
    #[serde(rename = "ADVANCED")]
    Advanced,
    #[serde(rename = "INHERIT")]
    Inherit,
    #[serde(untagged)]
    Other(String),
}

/// Who an access rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalType {
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "GROUP")]
    Group,
    #[serde(untagged)]
    Other(String),
}

/// Permission granted by an access rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "READ")]
    Read,
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "MODIFY")]
    Modify,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(untagged)]
    Other(String),
}

/// One entry of a node's access control list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Principal kind
    #[serde(rename = "type")]
    pub principal: PrincipalType,
    /// Principal key; `null` for `ALL`
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Granted permissions
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl AccessRule {
    /// Rule granting `permissions` to everybody
    #[must_use]
    pub fn everyone(permissions: Vec<Permission>) -> Self {
        Self {
            principal: PrincipalType::All,
            id: None,
            permissions,
            extra: Fields::new(),
        }
    }
}

/// A node of the tree namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Ancestor keys, root first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "accessControl", default, skip_serializing_if = "Option::is_none")]
    pub access_control: Option<AccessControlType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<Vec<AccessRule>>,
    /// Application-defined content (`inports`, `outports`, `processes`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Fields>,
    /// Cached process interface descriptor, kept as stored
    #[serde(rename = "processInterface", default, skip_serializing_if = "Option::is_none")]
    pub process_interface: Option<Value>,
    /// Cached list of referenced sub-model keys
    #[serde(rename = "processDependencies", default, skip_serializing_if = "Option::is_none")]
    pub process_dependencies: Option<Vec<String>>,
    /// Latest version number of the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl TreeNode {
    /// Whether this node is a model
    #[inline]
    #[must_use]
    pub fn is_model(&self) -> bool {
        self.node_type == NodeType::Model
    }

    /// Whether the node carries a non-empty content object
    #[inline]
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Field of the content object
    #[inline]
    #[must_use]
    pub fn content_field(&self, field: &str) -> Option<&Value> {
        self.content.as_ref().and_then(|c| c.get(field))
    }
}

impl Document for TreeNode {
    const COLLECTION: Collection = Collection::TreeNode;

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

/// Summary of a model's ports, cached on the node for fast lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInterfaceDescription {
    pub name: String,
    pub object_type: String,
    pub object_id: String,
    pub inports: Value,
    pub outports: Value,
    pub port_templates: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProcessInterfaceDescription {
    /// Derive the descriptor of a model node from its content ports
    ///
    /// Missing port maps become empty objects.
    #[must_use]
    pub fn for_model(node: &TreeNode) -> Self {
        let ports = |field| {
            node.content_field(field)
                .cloned()
                .unwrap_or_else(|| Value::Object(Fields::new()))
        };
        Self {
            name: node.label().to_string(),
            object_type: PROCESS_INTERFACE_DESCRIPTION.to_string(),
            object_id: node.id.as_str().to_string(),
            inports: ports("inports"),
            outports: ports("outports"),
            port_templates: Fields::new(),
            description: node.description.clone(),
        }
    }
}
