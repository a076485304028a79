//! CPT Document Model
//!
//! Typed views over the documents the capacity-planning application keeps
//! in its database.
//!
//! # Core Concepts
//!
//! - [`Collection`]: the four collections maintenance tooling touches
//! - [`DocumentId`]: a document key, either a plain string or an ObjectId
//! - [`Document`]: decode/encode between raw JSON and a typed record
//! - [`TreeNode`], [`ObjectHistory`], [`TreeNodeVersion`], [`AppUser`]:
//!   per-collection records
//!
//! Every record keeps the fields it does not model in an `extra` map.
//! Re-encoding normalises a document (`null` fields are skipped, modelled
//! fields come first), so changes are persisted with [`patch_document`],
//! which rewrites only the fields a mutation touched.
//!
//! # Example
//!
//! ```rust
//! use cpt_document::{Document, NodeType, TreeNode};
//! use serde_json::json;
//!
//! let node = TreeNode::decode(json!({
//!     "_id": "n1",
//!     "name": "Edge Model",
//!     "type": "MODEL",
//!     "owner": "bob"
//! }))
//! .unwrap();
//!
//! assert_eq!(node.node_type, NodeType::Model);
//! assert_eq!(node.encode().unwrap()["owner"], "bob");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod collection;
mod document;
mod error;
mod history;
mod id;
mod node_version;
mod patch;
mod tree_node;
mod user;

pub use collection::Collection;
pub use document::Document;
pub use error::DocumentError;
pub use history::{ObjectHistory, ObjectVersion};
pub use id::DocumentId;
pub use node_version::TreeNodeVersion;
pub use patch::patch_document;
pub use tree_node::{
    AccessControlType, AccessRule, NodeType, Permission, PrincipalType, ProcessInterfaceDescription,
    TreeNode, PROCESS_INTERFACE_DESCRIPTION, TREE_NODE_CLASS,
};
pub use user::{AppUser, Role};

/// Raw document body as stored in a collection
pub type RawDocument = serde_json::Value;

/// Field map used for nested objects and unmodelled fields
pub type Fields = serde_json::Map<String, serde_json::Value>;
