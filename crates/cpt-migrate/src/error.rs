//! Error types for migrations
//!
//! Three classes of failure:
//! - Store failures (open/read/write): always fatal
//! - Precondition violations on a document: fatal unless the run skips
//!   failing documents
//! - Already-migrated documents are not errors at all

use cpt_document::{Collection, DocumentError};
use cpt_store::StoreError;
use std::path::PathBuf;

/// Main migration error type
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Document could not be decoded or encoded
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Document violates a data-integrity assumption of the migration
    #[error("{collection} document {key}: {reason}")]
    Precondition {
        collection: Collection,
        key: String,
        reason: String,
    },

    /// Run stopped at the first failing document
    #[error("migration {migration} aborted at {collection} document {key}")]
    Aborted {
        migration: &'static str,
        collection: Collection,
        key: String,
        #[source]
        source: Box<MigrationError>,
    },

    /// Run finished but some documents were skipped
    #[error("migration {migration} left {count} document(s) unmigrated")]
    DocumentsFailed { migration: &'static str, count: usize },

    /// No migration with this name
    #[error("unknown migration: {0}")]
    UnknownMigration(String),
}

impl MigrationError {
    /// Create precondition violation for a document
    pub fn precondition(collection: Collection, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Precondition {
            collection,
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure comes from the store itself rather than from a
    /// document's content
    #[inline]
    #[must_use]
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(e) if !matches!(e, StoreError::Document(_)))
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid configuration in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aborted_names_its_cause_once() {
        let err = MigrationError::Aborted {
            migration: "add-version-nr",
            collection: Collection::TreeNode,
            key: "f1".into(),
            source: Box::new(MigrationError::precondition(Collection::ObjectHistory, "h1", "no versions")),
        };
        assert_eq!(err.to_string(), "migration add-version-nr aborted at treeNode document f1");
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "migration add-version-nr aborted at treeNode document f1: objectHistory document h1: no versions"
        );
    }
}
