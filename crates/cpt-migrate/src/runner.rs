//! Migration runner
//!
//! Applies one structural change across a collection:
//!
//! 1. Snapshot the collection's keys
//! 2. For each key, load and decode the document
//! 3. Ask the migration whether it applies; skip untouched documents
//! 4. Apply the change to an owned copy and upsert the stored document,
//!    patched with only the fields the change touched
//! 5. Flush the store once every document was handled
//!
//! A document is only written after its mutation fully succeeded, so a
//! failing migration never leaves a half-applied document behind. An aborted
//! run returns before the flush.

use cpt_document::{patch_document, Collection, Document, DocumentId};
use cpt_store::DocumentStore;
use serde_json::Value;
use std::fmt;

use crate::error::MigrationError;

/// A per-document structural change over one collection
///
/// `should_migrate` must turn false once `apply` ran, which is what makes
/// re-running a migration a no-op. The runner checks this after every
/// `apply`.
pub trait DocumentMigration {
    /// Record type of the migrated collection
    type Document: Document;

    /// Kebab-case name used in audit lines and on the command line
    fn name(&self) -> &'static str;

    /// Whether `document` still needs this migration
    ///
    /// # Errors
    /// Precondition violations or store read failures
    fn should_migrate(&self, document: &Self::Document, store: &dyn DocumentStore) -> Result<bool, MigrationError>;

    /// Produce the migrated document
    ///
    /// # Errors
    /// Precondition violations or store read failures
    fn apply(&self, document: Self::Document, store: &dyn DocumentStore) -> Result<Self::Document, MigrationError>;
}

/// What to do when a single document fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and report the failing document
    #[default]
    Abort,
    /// Record the failure, leave the document untouched, continue
    Skip,
}

/// Options of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Evaluate and report without writing
    pub dry_run: bool,
    /// Per-document failure handling
    pub failure_policy: FailurePolicy,
}

impl RunOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With dry run
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// With failure policy
    #[inline]
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// One mutated (or, in a dry run, mutable) document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub migration: &'static str,
    pub collection: Collection,
    pub key: DocumentId,
    /// Document name, or its key when it has none
    pub label: String,
    pub dry_run: bool,
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(f, "[dry-run] ")?;
        }
        write!(f, "{}: {} {}", self.migration, self.collection, self.label)?;
        if self.label != self.key.as_str() {
            write!(f, " ({})", self.key)?;
        }
        Ok(())
    }
}

/// Receives one entry per mutated document
pub trait AuditSink {
    fn record(&mut self, entry: &AuditEntry);
}

/// Prints audit entries to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutAudit;

impl AuditSink for StdoutAudit {
    fn record(&mut self, entry: &AuditEntry) {
        println!("{entry}");
    }
}

impl AuditSink for Vec<AuditEntry> {
    fn record(&mut self, entry: &AuditEntry) {
        self.push(entry.clone());
    }
}

/// Document left untouched because its migration failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDocument {
    pub key: String,
    pub error: String,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub migration: &'static str,
    pub dry_run: bool,
    /// Documents looked at
    pub scanned: usize,
    /// Documents written (or that would be written in a dry run)
    pub migrated: usize,
    /// Documents that did not need the migration
    pub unchanged: usize,
    /// Documents skipped after a failure
    pub failed: Vec<FailedDocument>,
}

impl MigrationReport {
    /// Empty report
    #[must_use]
    pub fn new(migration: &'static str, dry_run: bool) -> Self {
        Self {
            migration,
            dry_run,
            scanned: 0,
            migrated: 0,
            unchanged: 0,
            failed: Vec::new(),
        }
    }

    /// Whether every document was handled
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turn skipped documents into an error
    ///
    /// # Errors
    /// `MigrationError::DocumentsFailed` if any document failed
    pub fn into_result(self) -> Result<Self, MigrationError> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(MigrationError::DocumentsFailed {
                migration: self.migration,
                count: self.failed.len(),
            })
        }
    }
}

/// Run a migration over its collection
///
/// # Errors
/// - Store failures, always
/// - `MigrationError::Aborted` for the first failing document under
///   [`FailurePolicy::Abort`]
pub fn run_migration<M: DocumentMigration>(
    store: &mut dyn DocumentStore,
    migration: &M,
    options: RunOptions,
    audit: &mut dyn AuditSink,
) -> Result<MigrationReport, MigrationError> {
    let collection = M::Document::COLLECTION;
    let span = tracing::info_span!("migration", name = migration.name(), collection = %collection);
    let _guard = span.enter();

    let keys = store.keys(collection)?;
    tracing::info!(documents = keys.len(), dry_run = options.dry_run, "scan started");

    let mut report = MigrationReport::new(migration.name(), options.dry_run);
    for key in keys {
        let Some(raw) = store.get(collection, &key)? else {
            tracing::debug!(key = %key, "document removed during scan");
            continue;
        };
        report.scanned += 1;

        match prepare(migration, &key, raw, &*store) {
            Ok(None) => {
                tracing::trace!(key = %key, "already migrated");
                report.unchanged += 1;
            }
            Ok(Some((label, migrated))) => {
                if !options.dry_run {
                    store.upsert(collection, migrated)?;
                }
                tracing::info!(key = %key, label = %label, "document migrated");
                audit.record(&AuditEntry {
                    migration: migration.name(),
                    collection,
                    key,
                    label,
                    dry_run: options.dry_run,
                });
                report.migrated += 1;
            }
            Err(e) if e.is_store_failure() => return Err(e),
            Err(e) => match options.failure_policy {
                FailurePolicy::Abort => {
                    tracing::error!(key = %key, error = %e, "migration aborted");
                    return Err(MigrationError::Aborted {
                        migration: migration.name(),
                        collection,
                        key: key.to_string(),
                        source: Box::new(e),
                    });
                }
                FailurePolicy::Skip => {
                    tracing::warn!(key = %key, error = %e, "document skipped");
                    report.failed.push(FailedDocument {
                        key: key.to_string(),
                        error: e.to_string(),
                    });
                }
            },
        }
    }

    if !options.dry_run {
        store.flush()?;
    }

    tracing::info!(
        scanned = report.scanned,
        migrated = report.migrated,
        unchanged = report.unchanged,
        failed = report.failed.len(),
        "scan finished"
    );
    Ok(report)
}

/// Decode, test and migrate one document without touching the store
fn prepare<M: DocumentMigration>(
    migration: &M,
    key: &DocumentId,
    raw: Value,
    store: &dyn DocumentStore,
) -> Result<Option<(String, Value)>, MigrationError> {
    let collection = M::Document::COLLECTION;
    let document = M::Document::decode(raw.clone())?;
    if !migration.should_migrate(&document, store)? {
        return Ok(None);
    }

    let before = document.encode()?;
    let migrated = migration.apply(document, store)?;
    if migrated.id() != key {
        return Err(MigrationError::precondition(collection, key.as_str(), "migration changed the document key"));
    }
    if migration.should_migrate(&migrated, store)? {
        return Err(MigrationError::precondition(
            collection,
            key.as_str(),
            "document still needs migration after apply",
        ));
    }

    let label = migrated.label().to_string();
    let after = migrated.encode()?;
    Ok(Some((label, patch_document(raw, &before, &after)?)))
}
