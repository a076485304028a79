//! Error types for document stores

use cpt_document::{Collection, DocumentError};
use std::path::PathBuf;

/// Errors raised by store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database directory is held by another process
    #[error("database at {path} is locked by another run (remove the lock file if no run is active)")]
    Locked { path: PathBuf },

    /// IO error on a store file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Collection file line is not a JSON document
    #[error("malformed document at {path}:{line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Two documents share a key
    #[error("duplicate key {key} in {collection}")]
    DuplicateKey { collection: Collection, key: String },

    /// Insert of a key that already exists
    #[error("document {key} already exists in {collection}")]
    AlreadyExists { collection: Collection, key: String },

    /// Document could not be addressed or decoded
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Collection could not be serialized
    #[error("cannot serialize {collection}: {source}")]
    Serialize {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
