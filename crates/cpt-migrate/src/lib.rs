//! CPT Migrate
//!
//! Idempotent, auditable maintenance migrations for the capacity-planning
//! document database.
//!
//! # Core Concepts
//!
//! - [`DocumentMigration`]: a per-document predicate and mutation over one
//!   collection, run by [`run_migration`]
//! - [`Seed`]: fixed documents inserted when absent, run by [`run_seed`]
//! - [`MigrationName`]: the catalog of concrete migrations
//! - [`MigrationReport`]: what a run scanned, changed, skipped and failed
//!
//! # Example
//!
//! ```rust
//! use cpt_document::Collection;
//! use cpt_migrate::{MigrationName, RunOptions, SeedConfig};
//! use cpt_store::{DocumentStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let mut audit = Vec::new();
//! let report = MigrationName::SeedAdminUser
//!     .run(&mut store, &SeedConfig::new(), RunOptions::new(), &mut audit)
//!     .unwrap();
//!
//! assert_eq!(report.migrated, 1);
//! assert!(store.contains(Collection::User, &"admin".into()).unwrap());
//! assert_eq!(audit[0].to_string(), "seed-admin-user: user admin");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod migrations;
pub mod runner;
pub mod seed;
pub mod telemetry;

pub use catalog::MigrationName;
pub use config::{MigrateConfig, SeedConfig};
pub use error::{ConfigError, MigrationError};
pub use runner::{
    run_migration, AuditEntry, AuditSink, DocumentMigration, FailedDocument, FailurePolicy, MigrationReport,
    RunOptions, StdoutAudit,
};
pub use seed::{run_seed, Seed, SeedDocument};

/// Version of the migration tools
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
