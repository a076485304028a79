//! End-to-end runs of the concrete migrations against memory stores

use cpt_document::{AppUser, Collection, DocumentId, NodeType, ObjectHistory, Role, TreeNode};
use cpt_migrate::{FailurePolicy, MigrationError, MigrationName, RunOptions, SeedConfig};
use cpt_store::{DocumentStore, DocumentStoreExt, MemoryStore};
use cpt_test_utils::{folder_node, history, legacy_version, model_node, store_with};
use pretty_assertions::assert_eq;
use serde_json::json;

fn run(name: MigrationName, store: &mut MemoryStore) -> Result<cpt_migrate::MigrationReport, MigrationError> {
    name.run(store, &SeedConfig::new(), RunOptions::new(), &mut Vec::new())
}

#[test]
fn seeding_empty_database() {
    let mut store = MemoryStore::new();
    let mut audit = Vec::new();
    for name in [MigrationName::SeedAdminUser, MigrationName::SeedForecastRoot] {
        name.run(&mut store, &SeedConfig::new(), RunOptions::new(), &mut audit)
            .unwrap();
    }

    assert_eq!(store.len(Collection::User), 1);
    let admin: AppUser = store.load(&"admin".into()).unwrap().unwrap();
    assert_eq!(admin.username, "admin");
    assert_eq!(admin.role, Role::Admin);

    assert_eq!(store.len(Collection::TreeNode), 1);
    let root: TreeNode = store.load(&"fc_root".into()).unwrap().unwrap();
    assert_eq!(root.node_type, NodeType::Folder);
    assert_eq!(root.ancestors, Some(Vec::new()));

    assert_eq!(store.len(Collection::ObjectHistory), 1);
    let root_history: ObjectHistory = store.load(&"history_TreeNode_fc_root".into()).unwrap().unwrap();
    assert_eq!(root_history.previous_versions.len(), 1);
    assert_eq!(root_history.latest_version_id(), Some(1));

    let lines: Vec<String> = audit.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "seed-admin-user: user admin",
            "seed-forecast-root: treeNode fc_root",
            "seed-forecast-root: objectHistory history_TreeNode_fc_root",
        ]
    );
}

#[test]
fn seeding_never_overwrites() {
    let customised = json!({"_id": "admin", "username": "admin", "role": "READ_ONLY", "isLdapUser": "true"});
    let mut store = store_with(Collection::User, [customised.clone()]);

    let report = run(MigrationName::SeedAdminUser, &mut store).unwrap();

    assert_eq!(report.migrated, 0);
    assert_eq!(report.unchanged, 1);
    assert_eq!(store.get(Collection::User, &"admin".into()).unwrap(), Some(customised));
}

#[test]
fn partial_seed_fills_the_gap() {
    let mut store = store_with(Collection::TreeNode, [folder_node("fc_root", "fc_root", &[])]);

    let report = run(MigrationName::SeedForecastRoot, &mut store).unwrap();

    assert_eq!(report.migrated, 1);
    assert!(store.contains(Collection::ObjectHistory, &"history_TreeNode_fc_root".into()).unwrap());
    assert_eq!(
        store.get(Collection::TreeNode, &"fc_root".into()).unwrap(),
        Some(folder_node("fc_root", "fc_root", &[]))
    );
}

#[test]
fn model_gets_process_interface() {
    let mut store = store_with(
        Collection::TreeNode,
        [
            folder_node("f1", "Models", &["fc_root"]),
            model_node(
                "m1",
                "Edge",
                json!({"inports": ["a"], "outports": ["b"], "processes": {}}),
            ),
        ],
    );
    let mut audit = Vec::new();

    let report = MigrationName::AddProcessInterface
        .run(&mut store, &SeedConfig::new(), RunOptions::new(), &mut audit)
        .unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.migrated, 1);
    assert_eq!(audit[0].to_string(), "add-process-interface: treeNode Edge (m1)");
    let model = store.get(Collection::TreeNode, &"m1".into()).unwrap().unwrap();
    assert_eq!(
        model["processInterface"],
        json!({
            "name": "Edge",
            "objectType": "PROCESS_INTERFACE_DESCRIPTION",
            "objectId": "m1",
            "inports": ["a"],
            "outports": ["b"],
            "portTemplates": {}
        })
    );
    assert_eq!(model["_class"], cpt_document::TREE_NODE_CLASS);
    assert_eq!(
        store.get(Collection::TreeNode, &"f1".into()).unwrap(),
        Some(folder_node("f1", "Models", &["fc_root"]))
    );
}

#[test]
fn version_owner_renamed() {
    let mut store = store_with(Collection::TreeNodeVersion, [legacy_version("v1", "alice")]);

    run(MigrationName::RenameVersionOwner, &mut store).unwrap();

    let version = store.get(Collection::TreeNodeVersion, &"v1".into()).unwrap().unwrap();
    assert_eq!(version["ownerId"], "alice");
    assert!(version.get("userId").is_none());
    assert_eq!(version["description"], "initial");
}

#[test]
fn version_number_from_history() {
    let mut store = store_with(
        Collection::TreeNode,
        [model_node("m1", "Edge", json!({"inports": {}, "outports": {}, "processes": {}}))],
    );
    store = store
        .with_documents(Collection::ObjectHistory, [history("m1", &[1, 2, 3])])
        .unwrap();

    run(MigrationName::AddVersionNr, &mut store).unwrap();

    assert_eq!(store.get(Collection::TreeNode, &"m1".into()).unwrap().unwrap()["version"], 3);
    assert_eq!(
        store.get(Collection::ObjectHistory, &"history_TreeNode_m1".into()).unwrap(),
        Some(history("m1", &[1, 2, 3]))
    );
}

#[test]
fn dependencies_from_graph_model_processes() {
    let mut store = store_with(
        Collection::TreeNode,
        [model_node(
            "m1",
            "Edge",
            json!({
                "inports": {},
                "outports": {},
                "processes": {
                    "p1": {"type": "GRAPH_MODEL", "ref": "sub-1"},
                    "p2": {"type": "BREAKDOWN"},
                    "p3": {"type": "GRAPH_MODEL", "ref": "sub-2"}
                }
            }),
        )],
    );

    run(MigrationName::AddProcessDependencies, &mut store).unwrap();

    assert_eq!(
        store.get(Collection::TreeNode, &"m1".into()).unwrap().unwrap()["processDependencies"],
        json!(["sub-1", "sub-2"])
    );
}

#[test]
fn failing_document_left_byte_identical() {
    let broken = model_node(
        "m1",
        "Broken",
        json!({"processes": {"p1": {"type": "GRAPH_MODEL"}}}),
    );
    let fine = model_node(
        "m2",
        "Fine",
        json!({"processes": {"p1": {"type": "GRAPH_MODEL", "ref": "m1"}}}),
    );
    let mut store = store_with(Collection::TreeNode, [broken.clone(), fine]);
    let before = serde_json::to_string(&broken).unwrap();

    let err = run(MigrationName::AddProcessDependencies, &mut store).unwrap_err();
    assert!(matches!(err, MigrationError::Aborted { ref key, .. } if key == "m1"));

    let after = store.get(Collection::TreeNode, &"m1".into()).unwrap().unwrap();
    assert_eq!(serde_json::to_string(&after).unwrap(), before);
    assert!(store.get(Collection::TreeNode, &"m2".into()).unwrap().unwrap().get("processDependencies").is_none());
}

#[test]
fn skipped_failures_still_fail_the_run() {
    let mut store = store_with(
        Collection::TreeNode,
        [
            model_node("m1", "Broken", json!({"processes": [{"type": "GRAPH_MODEL"}]})),
            model_node("m2", "Fine", json!({"processes": [{"type": "GRAPH_MODEL", "ref": "m1"}]})),
        ],
    );
    let options = RunOptions::new().with_failure_policy(FailurePolicy::Skip);

    let report = MigrationName::AddProcessDependencies
        .run(&mut store, &SeedConfig::new(), options, &mut Vec::new())
        .unwrap();

    assert_eq!(report.migrated, 1);
    assert_eq!(report.failed.len(), 1);
    assert!(report.into_result().is_err());
    assert_eq!(
        store.get(Collection::TreeNode, &"m2".into()).unwrap().unwrap()["processDependencies"],
        json!(["m1"])
    );
}

#[test]
fn empty_history_aborts_version_numbering() {
    let mut store = store_with(Collection::TreeNode, [folder_node("f1", "Empty", &["fc_root"])])
        .with_documents(Collection::ObjectHistory, [history("f1", &[])])
        .unwrap();

    let err = run(MigrationName::AddVersionNr, &mut store).unwrap_err();

    assert!(err.to_string().contains("aborted at treeNode document f1"));
}

#[test]
fn stored_nulls_and_field_order_survive_a_migration() {
    let stored = r#"{"_id":"m1","ownerId":"bob","name":"Edge","type":"MODEL","description":null,"ancestors":null,"content":{"inports":{},"outports":{},"processes":{}},"trashed":false}"#;
    let mut store = store_with(Collection::TreeNode, [serde_json::from_str(stored).unwrap()])
        .with_documents(Collection::ObjectHistory, [history("m1", &[1, 2])])
        .unwrap();

    run(MigrationName::AddVersionNr, &mut store).unwrap();

    let written = store.get(Collection::TreeNode, &"m1".into()).unwrap().unwrap();
    assert_eq!(
        serde_json::to_string(&written).unwrap(),
        r#"{"_id":"m1","ownerId":"bob","name":"Edge","type":"MODEL","description":null,"ancestors":null,"content":{"inports":{},"outports":{},"processes":{}},"trashed":false,"version":2}"#
    );
}

#[test]
fn extended_json_history_is_numbered() {
    let mut stored = history("m1", &[1, 2]);
    stored["previousVersions"][1]["timestamp"] = json!({"$date": "2019-01-29T16:10:09.000Z"});
    stored["previousVersions"][1]["userId"] = json!({"$oid": "5c507a2f1c9d440000a1b2c3"});
    let mut store = store_with(
        Collection::TreeNode,
        [model_node("m1", "Edge", json!({"processes": {}}))],
    )
    .with_documents(Collection::ObjectHistory, [stored.clone()])
    .unwrap();

    run(MigrationName::AddVersionNr, &mut store).unwrap();

    assert_eq!(store.get(Collection::TreeNode, &"m1".into()).unwrap().unwrap()["version"], 2);
    assert_eq!(
        store.get(Collection::ObjectHistory, &"history_TreeNode_m1".into()).unwrap(),
        Some(stored)
    );
}

#[test]
fn non_string_author_is_moved() {
    let mut store = store_with(
        Collection::TreeNodeVersion,
        [json!({"_id": "v1", "userId": 42, "description": "initial"})],
    );

    run(MigrationName::RenameVersionOwner, &mut store).unwrap();

    let version = store.get(Collection::TreeNodeVersion, &"v1".into()).unwrap().unwrap();
    assert_eq!(serde_json::to_string(&version).unwrap(), r#"{"_id":"v1","description":"initial","ownerId":42}"#);
}

#[test]
fn object_id_and_text_keys_migrate_separately() {
    let mut store = store_with(
        Collection::TreeNodeVersion,
        [
            json!({"_id": "5c507a2f1c9d440000a1b2c3", "userId": "alice"}),
            json!({"_id": {"$oid": "5c507a2f1c9d440000a1b2c3"}, "userId": "bob"}),
        ],
    );

    let report = run(MigrationName::RenameVersionOwner, &mut store).unwrap();

    assert_eq!(report.migrated, 2);
    let text = store
        .get(Collection::TreeNodeVersion, &"5c507a2f1c9d440000a1b2c3".into())
        .unwrap()
        .unwrap();
    let oid = store
        .get(
            Collection::TreeNodeVersion,
            &DocumentId::ObjectId("5c507a2f1c9d440000a1b2c3".into()),
        )
        .unwrap()
        .unwrap();
    assert_eq!(text["ownerId"], "alice");
    assert_eq!(oid["ownerId"], "bob");
    assert_eq!(oid["_id"], json!({"$oid": "5c507a2f1c9d440000a1b2c3"}));
}

#[test]
fn add_then_remove_interface_restores_stored_text() {
    let stored = r#"{"_id":"m1","type":"MODEL","ownerId":"bob","name":"Edge","description":null,"ancestors":null,"content":{"inports":["a"]}}"#;
    let mut store = store_with(Collection::TreeNode, [serde_json::from_str(stored).unwrap()]);

    run(MigrationName::AddProcessInterface, &mut store).unwrap();
    run(MigrationName::RemoveProcessInterface, &mut store).unwrap();

    let restored = store.get(Collection::TreeNode, &"m1".into()).unwrap().unwrap();
    assert_eq!(serde_json::to_string(&restored).unwrap(), stored);
}
