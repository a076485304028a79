//! Store location

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a directory store keeps its collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Parent directory of all databases
    pub data_dir: PathBuf,
    /// Database name; collections live in `<data_dir>/<database>/`
    pub database: String,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// With database name
    #[inline]
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Directory holding this database's collection files
    #[must_use]
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(&self.database)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Path::new("data").to_path_buf(),
            database: "cpt".to_string(),
        }
    }
}
