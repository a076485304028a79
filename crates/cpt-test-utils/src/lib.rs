//! Testing utilities for the cpt-migrate workspace
//!
//! Document fixtures, store builders and proptest strategies over realistic
//! database contents.

#![allow(missing_docs)]

use cpt_document::Collection;
use cpt_store::MemoryStore;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// MODEL node with the given content object
pub fn model_node(id: &str, name: &str, content: Value) -> Value {
    json!({
        "_id": id,
        "_class": cpt_document::TREE_NODE_CLASS,
        "name": name,
        "type": "MODEL",
        "ancestors": ["fc_root"],
        "accessControl": "INHERIT",
        "content": content
    })
}

/// FOLDER node below `ancestors`
pub fn folder_node(id: &str, name: &str, ancestors: &[&str]) -> Value {
    json!({
        "_id": id,
        "name": name,
        "type": "FOLDER",
        "ancestors": ancestors,
        "accessControl": "INHERIT"
    })
}

/// History of a tree node holding one snapshot per version id
pub fn history(object_id: &str, version_ids: &[i64]) -> Value {
    let versions: Vec<Value> = version_ids
        .iter()
        .map(|id| {
            json!({
                "versionId": id,
                "timestamp": "2019-03-01T12:00:00.000Z",
                "userId": "admin",
                "object": {"_id": object_id}
            })
        })
        .collect();
    json!({
        "_id": format!("history_TreeNode_{object_id}"),
        "objectId": object_id,
        "type": "TreeNode",
        "previousVersions": versions
    })
}

/// Tree node version recorded with the legacy `userId` author field
pub fn legacy_version(id: &str, user_id: &str) -> Value {
    json!({
        "_id": id,
        "versionId": 1,
        "objectId": "m1",
        "timestamp": "2019-03-01T12:00:00.000Z",
        "userId": user_id,
        "object": {},
        "description": "initial"
    })
}

/// Memory store holding `documents` in `collection`
pub fn store_with(collection: Collection, documents: impl IntoIterator<Item = Value>) -> MemoryStore {
    MemoryStore::new().with_documents(collection, documents).unwrap()
}

fn node_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        3 => Just("MODEL"),
        1 => Just("FOLDER"),
        1 => Just("SIMULATION"),
        1 => Just("FC_SHEET"),
        1 => Just("MODELTEMPLATE"),
        1 => Just("DASHBOARD"),
    ]
}

fn ports() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec("[a-z]{1,4}", 0..3).prop_map(|names| json!(names)),
        prop::collection::btree_map("[a-z]{1,4}", Just(json!({"type": "PORT"})), 0..3)
            .prop_map(|ports| Value::Object(ports.into_iter().collect())),
    ]
}

fn processes() -> impl Strategy<Value = Value> {
    let process = prop_oneof![
        (0..8u8).prop_map(|k| json!({"type": "GRAPH_MODEL", "ref": format!("n{k}")})),
        Just(json!({"type": "BREAKDOWN"})),
        Just(json!({"type": "CALCULATION"})),
    ];
    prop::collection::vec(process, 0..4).prop_map(|list| {
        let map: Map<String, Value> = list
            .into_iter()
            .enumerate()
            .map(|(i, p)| (format!("p{i}"), p))
            .collect();
        Value::Object(map)
    })
}

fn content() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(json!({}))),
        4 => (ports(), ports(), processes())
            .prop_map(|(i, o, p)| Some(json!({"inports": i, "outports": o, "processes": p}))),
    ]
}

/// Absent, explicitly `null`, or set
fn nullable<S: Strategy>(value: S) -> impl Strategy<Value = Option<Value>>
where
    S::Value: Into<Value>,
{
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        value.prop_map(|v| Some(v.into())),
    ]
}

fn node_body() -> impl Strategy<Value = Value> {
    (
        node_type(),
        prop::option::of("[A-Z][a-z]{2,8}"),
        content(),
        any::<bool>(),
        prop::option::of(prop::collection::vec("n[0-7]", 0..3)),
        prop::option::of(1..5i64),
        prop::option::of("[a-z]{3,6}"),
        nullable("[a-z ]{0,12}"),
        nullable(prop::collection::vec("n[0-7]", 0..3)),
        nullable(any::<bool>()),
    )
        .prop_map(
            |(ty, name, content, cached, deps, version, owner, description, ancestors, trashed)| {
                let mut node = Map::new();
                if let Some(trashed) = trashed {
                    node.insert("trashed".into(), trashed);
                }
                node.insert("type".into(), json!(ty));
                if let Some(description) = description {
                    node.insert("description".into(), description);
                }
                if let Some(name) = name {
                    node.insert("name".into(), json!(name));
                }
                if let Some(owner) = owner {
                    node.insert("ownerId".into(), json!(owner));
                }
                if let Some(content) = content {
                    node.insert("content".into(), content);
                }
                if cached {
                    node.insert("processInterface".into(), json!({"name": "stale"}));
                }
                if let Some(ancestors) = ancestors {
                    node.insert("ancestors".into(), ancestors);
                }
                if let Some(deps) = deps {
                    node.insert("processDependencies".into(), json!(deps));
                }
                if let Some(version) = version {
                    node.insert("version".into(), json!(version));
                }
                Value::Object(node)
            },
        )
}

/// Tree nodes keyed `n0`, `n1`, ...
pub fn arb_tree_nodes() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(node_body(), 0..10).prop_map(|bodies| {
        bodies
            .into_iter()
            .enumerate()
            .map(|(i, mut body)| {
                if let Value::Object(fields) = &mut body {
                    fields.insert("_id".into(), json!(format!("n{i}")));
                }
                body
            })
            .collect()
    })
}

/// Any value an author field has been seen to hold
fn author() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => "[a-z]{3,6}".prop_map(Value::from),
        1 => (1..1000i64).prop_map(Value::from),
        1 => "[0-9a-f]{24}".prop_map(|oid| json!({"$oid": oid})),
    ]
}

/// Tree node versions, some with the legacy author field
pub fn arb_node_versions() -> impl Strategy<Value = Vec<Value>> {
    let fields = (
        prop::option::of(author()),
        prop::option::of(author()),
        nullable("[a-z ]{0,12}"),
    );
    prop::collection::vec(fields, 0..8).prop_map(|versions| {
        versions
            .into_iter()
            .enumerate()
            .map(|(i, (user, owner, description))| {
                let mut version = Map::new();
                version.insert("_id".into(), json!(format!("v{i}")));
                if let Some(owner) = owner {
                    version.insert("ownerId".into(), owner);
                }
                version.insert("versionId".into(), json!(i + 1));
                if let Some(user) = user {
                    version.insert("userId".into(), user);
                }
                if let Some(description) = description {
                    version.insert("description".into(), description);
                }
                version.insert("timestamp".into(), json!({"$date": "2019-03-01T12:00:00.000Z"}));
                Value::Object(version)
            })
            .collect()
    })
}

/// A database of tree nodes, histories for some of them and node versions
pub fn arb_database() -> impl Strategy<Value = MemoryStore> {
    (
        arb_tree_nodes(),
        prop::collection::vec(prop::option::of(prop::collection::btree_set(1..20i64, 1..5)), 10),
        arb_node_versions(),
    )
        .prop_map(|(nodes, version_sets, versions)| {
            let histories: Vec<Value> = nodes
                .iter()
                .zip(version_sets)
                .filter_map(|(node, ids)| {
                    let ids: Vec<i64> = ids?.into_iter().collect();
                    Some(history(node["_id"].as_str()?, &ids))
                })
                .collect();
            MemoryStore::new()
                .with_documents(Collection::TreeNode, nodes)
                .and_then(|s| s.with_documents(Collection::ObjectHistory, histories))
                .and_then(|s| s.with_documents(Collection::TreeNodeVersion, versions))
                .unwrap()
        })
}
