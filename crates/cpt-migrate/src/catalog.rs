//! Migration catalog

use cpt_store::DocumentStore;
use std::fmt;
use std::str::FromStr;

use crate::config::SeedConfig;
use crate::error::MigrationError;
use crate::migrations::{
    AddProcessDependencies, AddProcessInterface, AddVersionNr, RemoveProcessInterface, RenameVersionOwner,
    SeedAdminUser, SeedForecastRoot,
};
use crate::runner::{run_migration, AuditSink, MigrationReport, RunOptions};
use crate::seed::run_seed;

/// Every migration the tools can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationName {
    SeedAdminUser,
    SeedForecastRoot,
    AddProcessInterface,
    RemoveProcessInterface,
    AddProcessDependencies,
    AddVersionNr,
    RenameVersionOwner,
}

impl MigrationName {
    /// All migrations in listing order
    pub const ALL: [MigrationName; 7] = [
        MigrationName::SeedAdminUser,
        MigrationName::SeedForecastRoot,
        MigrationName::AddProcessInterface,
        MigrationName::RemoveProcessInterface,
        MigrationName::AddProcessDependencies,
        MigrationName::AddVersionNr,
        MigrationName::RenameVersionOwner,
    ];

    /// Kebab-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MigrationName::SeedAdminUser => "seed-admin-user",
            MigrationName::SeedForecastRoot => "seed-forecast-root",
            MigrationName::AddProcessInterface => "add-process-interface",
            MigrationName::RemoveProcessInterface => "remove-process-interface",
            MigrationName::AddProcessDependencies => "add-process-dependencies",
            MigrationName::AddVersionNr => "add-version-nr",
            MigrationName::RenameVersionOwner => "rename-version-owner",
        }
    }

    /// One-line summary for listings and `--help`
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            MigrationName::SeedAdminUser => "Create the admin user if it does not exist",
            MigrationName::SeedForecastRoot => "Create the fc_root folder and its history if they do not exist",
            MigrationName::AddProcessInterface => "Attach a processInterface descriptor to every model with content",
            MigrationName::RemoveProcessInterface => "Remove the processInterface descriptor from every model",
            MigrationName::AddProcessDependencies => "Set processDependencies from each model's GRAPH_MODEL processes",
            MigrationName::AddVersionNr => "Set each tree node's version from its object history",
            MigrationName::RenameVersionOwner => "Move userId to ownerId on tree node versions",
        }
    }

    /// Run this migration against `store`
    ///
    /// # Errors
    /// Any error of [`run_migration`] or [`run_seed`]
    pub fn run(
        self,
        store: &mut dyn DocumentStore,
        seed: &SeedConfig,
        options: RunOptions,
        audit: &mut dyn AuditSink,
    ) -> Result<MigrationReport, MigrationError> {
        match self {
            MigrationName::SeedAdminUser => run_seed(
                store,
                &SeedAdminUser::new().with_password(seed.admin_password.clone()),
                options,
                audit,
            ),
            MigrationName::SeedForecastRoot => {
                run_seed(store, &SeedForecastRoot::new(seed.history_user.clone()), options, audit)
            }
            MigrationName::AddProcessInterface => run_migration(store, &AddProcessInterface, options, audit),
            MigrationName::RemoveProcessInterface => run_migration(store, &RemoveProcessInterface, options, audit),
            MigrationName::AddProcessDependencies => run_migration(store, &AddProcessDependencies, options, audit),
            MigrationName::AddVersionNr => run_migration(store, &AddVersionNr, options, audit),
            MigrationName::RenameVersionOwner => run_migration(store, &RenameVersionOwner, options, audit),
        }
    }
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationName {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| MigrationError::UnknownMigration(s.to_string()))
    }
}

/// Run the migration called `name`
///
/// # Errors
/// - `MigrationError::UnknownMigration` for an unknown name
/// - Any error of [`MigrationName::run`]
pub fn run(
    name: &str,
    store: &mut dyn DocumentStore,
    seed: &SeedConfig,
    options: RunOptions,
    audit: &mut dyn AuditSink,
) -> Result<MigrationReport, MigrationError> {
    name.parse::<MigrationName>()?.run(store, seed, options, audit)
}
