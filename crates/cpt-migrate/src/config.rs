//! Tool configuration
//!
//! Resolution order:
//! 1. File named by `CPT_MIGRATE_CONFIG`, else `cpt-migrate.toml` in the
//!    working directory when it exists, else built-in defaults
//! 2. `CPT_MIGRATE_DATA_DIR` and `CPT_MIGRATE_DATABASE` override the store
//!    location
//!
//! ```toml
//! [store]
//! data_dir = "/var/lib/cpt/export"
//! database = "cpt"
//!
//! [seed]
//! history_user = "admin"
//! ```

use cpt_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Names the config file to load
pub const CONFIG_ENV: &str = "CPT_MIGRATE_CONFIG";
/// Overrides `store.data_dir`
pub const DATA_DIR_ENV: &str = "CPT_MIGRATE_DATA_DIR";
/// Overrides `store.database`
pub const DATABASE_ENV: &str = "CPT_MIGRATE_DATABASE";
/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cpt-migrate.toml";

/// Values the seeds write into new documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Stored credential of the seeded `admin` user, already in the form
    /// the application expects
    pub admin_password: Option<String>,
    /// `userId` recorded on seeded history entries
    pub history_user: String,
}

impl SeedConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With admin password
    #[inline]
    #[must_use]
    pub fn with_admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = Some(password.into());
        self
    }

    /// With history user
    #[inline]
    #[must_use]
    pub fn with_history_user(mut self, user: impl Into<String>) -> Self {
        self.history_user = user.into();
        self
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_password: None,
            history_user: "admin".to_string(),
        }
    }
}

/// Complete tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    pub store: StoreConfig,
    pub seed: SeedConfig,
}

impl MigrateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With store location
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// With seed values
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: SeedConfig) -> Self {
        self.seed = seed;
        self
    }

    /// Load from the process environment
    ///
    /// # Errors
    /// `ConfigError` if the selected file cannot be read or parsed
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Load with an explicit environment lookup
    ///
    /// # Errors
    /// `ConfigError` if the selected file cannot be read or parsed
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = match env(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(env))
    }

    /// Parse a config file
    ///
    /// # Errors
    /// `ConfigError::Io` or `ConfigError::Parse`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// TOML syntax or schema errors
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn with_env_overrides(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = env(DATA_DIR_ENV) {
            self.store.data_dir = PathBuf::from(dir);
        }
        if let Some(database) = env(DATABASE_ENV) {
            self.store.database = database;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = MigrateConfig::from_toml_str("[store]\ndatabase = \"cpt_test\"\n").unwrap();
        assert_eq!(config.store.database, "cpt_test");
        assert_eq!(config.store.data_dir, PathBuf::from("data"));
        assert_eq!(config.seed, SeedConfig::default());
    }

    #[test]
    fn unknown_key_type_is_rejected() {
        assert!(MigrateConfig::from_toml_str("[store]\ndatabase = 3\n").is_err());
    }

    #[test]
    fn env_file_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[store]\ndata_dir = \"/srv/export\"\ndatabase = \"cpt\"\n\n[seed]\nhistory_user = \"ops\""
        )
        .unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = MigrateConfig::load_with(env(&[(CONFIG_ENV, path.as_str()), (DATABASE_ENV, "cpt_staging")])).unwrap();

        assert_eq!(config.store.data_dir, PathBuf::from("/srv/export"));
        assert_eq!(config.store.database, "cpt_staging");
        assert_eq!(config.seed.history_user, "ops");
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let err = MigrateConfig::load_with(env(&[(CONFIG_ENV, "/nonexistent/cpt-migrate.toml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn builders() {
        let config = MigrateConfig::new()
            .with_store(StoreConfig::new().with_database("other"))
            .with_seed(SeedConfig::new().with_admin_password("secret").with_history_user("root"));
        assert_eq!(config.store.database, "other");
        assert_eq!(config.seed.admin_password.as_deref(), Some("secret"));
        assert_eq!(config.seed.history_user, "root");
    }
}
