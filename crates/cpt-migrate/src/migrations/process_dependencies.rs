//! Cached sub-model references on model nodes

use cpt_document::{Document, TreeNode};
use cpt_store::DocumentStore;
use serde_json::Value;

use super::GRAPH_MODEL;
use crate::error::MigrationError;
use crate::runner::DocumentMigration;

/// Keys of the graph models a model's processes refer to, in process order
///
/// `content.processes` is keyed by process id in current documents and a
/// plain list in some legacy ones; both are accepted.
///
/// # Errors
/// `MigrationError::Precondition` if a `GRAPH_MODEL` process has no string
/// `ref`
pub fn graph_model_refs(node: &TreeNode) -> Result<Vec<String>, MigrationError> {
    let processes: Vec<&Value> = match node.content_field("processes") {
        Some(Value::Object(map)) => map.values().collect(),
        Some(Value::Array(list)) => list.iter().collect(),
        _ => return Ok(Vec::new()),
    };

    let mut refs = Vec::new();
    for process in processes {
        if process.get("type").and_then(Value::as_str) != Some(GRAPH_MODEL) {
            continue;
        }
        match process.get("ref").and_then(Value::as_str) {
            Some(key) => refs.push(key.to_string()),
            None => {
                return Err(MigrationError::precondition(
                    TreeNode::COLLECTION,
                    node.id.as_str(),
                    "GRAPH_MODEL process without ref",
                ))
            }
        }
    }
    Ok(refs)
}

/// Sets `processDependencies` from the `GRAPH_MODEL` processes of models
#[derive(Debug, Clone, Copy, Default)]
pub struct AddProcessDependencies;

impl DocumentMigration for AddProcessDependencies {
    type Document = TreeNode;

    fn name(&self) -> &'static str {
        "add-process-dependencies"
    }

    fn should_migrate(&self, node: &TreeNode, _store: &dyn DocumentStore) -> Result<bool, MigrationError> {
        if !node.is_model() {
            return Ok(false);
        }
        let refs = graph_model_refs(node)?;
        Ok(!refs.is_empty() && node.process_dependencies.as_ref() != Some(&refs))
    }

    fn apply(&self, mut node: TreeNode, _store: &dyn DocumentStore) -> Result<TreeNode, MigrationError> {
        node.process_dependencies = Some(graph_model_refs(&node)?);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpt_store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn model(processes: Value) -> TreeNode {
        TreeNode::decode(json!({
            "_id": "m1",
            "type": "MODEL",
            "content": {"inports": {}, "outports": {}, "processes": processes}
        }))
        .unwrap()
    }

    #[test]
    fn refs_in_process_order() {
        let node = model(json!({
            "p1": {"type": "GRAPH_MODEL", "ref": "sub-b"},
            "p2": {"type": "BREAKDOWN", "name": "split"},
            "p3": {"type": "GRAPH_MODEL", "ref": "sub-a"}
        }));
        assert_eq!(graph_model_refs(&node).unwrap(), vec!["sub-b", "sub-a"]);
    }

    #[test]
    fn legacy_process_list() {
        let node = model(json!([{"type": "GRAPH_MODEL", "ref": "sub"}]));
        assert_eq!(graph_model_refs(&node).unwrap(), vec!["sub"]);
    }

    #[test]
    fn missing_ref_is_a_precondition_error() {
        let node = model(json!({"p1": {"type": "GRAPH_MODEL"}}));
        assert!(matches!(
            graph_model_refs(&node),
            Err(MigrationError::Precondition { .. })
        ));
    }

    #[test]
    fn converges_and_refreshes_stale_lists() {
        let store = MemoryStore::new();
        let mut node = model(json!({"p1": {"type": "GRAPH_MODEL", "ref": "sub"}}));
        node.process_dependencies = Some(vec!["gone".into()]);
        assert!(AddProcessDependencies.should_migrate(&node, &store).unwrap());

        let migrated = AddProcessDependencies.apply(node, &store).unwrap();
        assert_eq!(migrated.process_dependencies, Some(vec!["sub".to_string()]));
        assert!(!AddProcessDependencies.should_migrate(&migrated, &store).unwrap());
    }

    #[test]
    fn models_without_sub_models_are_skipped() {
        let store = MemoryStore::new();
        let node = model(json!({"p1": {"type": "BREAKDOWN"}}));
        assert!(!AddProcessDependencies.should_migrate(&node, &store).unwrap());
    }
}
