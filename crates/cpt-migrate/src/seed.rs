//! Seed runner
//!
//! The insert-if-absent form of a migration: each seed document is written
//! only when its key is not taken yet. Existing documents are never touched,
//! whatever they contain. The store is flushed once after the last insert.

use cpt_document::{Collection, Document, DocumentId};
use cpt_store::DocumentStore;
use serde_json::Value;

use crate::error::MigrationError;
use crate::runner::{AuditEntry, AuditSink, MigrationReport, RunOptions};

/// A document a seed wants to exist
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDocument {
    pub collection: Collection,
    pub label: String,
    pub document: Value,
}

impl SeedDocument {
    /// Seed document from a typed record
    ///
    /// # Errors
    /// `MigrationError::Document` if the record cannot be encoded
    pub fn from_record<D: Document>(record: &D) -> Result<Self, MigrationError> {
        Ok(Self {
            collection: D::COLLECTION,
            label: record.label().to_string(),
            document: record.encode()?,
        })
    }
}

/// Fixed documents that must exist
pub trait Seed {
    /// Kebab-case name used in audit lines and on the command line
    fn name(&self) -> &'static str;

    /// Documents to insert when absent, in insertion order
    ///
    /// # Errors
    /// Encoding failures
    fn documents(&self) -> Result<Vec<SeedDocument>, MigrationError>;
}

/// Insert every seed document whose key is absent
///
/// # Errors
/// Store failures and seed encoding failures
pub fn run_seed<S: Seed + ?Sized>(
    store: &mut dyn DocumentStore,
    seed: &S,
    options: RunOptions,
    audit: &mut dyn AuditSink,
) -> Result<MigrationReport, MigrationError> {
    let span = tracing::info_span!("seed", name = seed.name());
    let _guard = span.enter();

    let mut report = MigrationReport::new(seed.name(), options.dry_run);
    for SeedDocument {
        collection,
        label,
        document,
    } in seed.documents()?
    {
        let key = DocumentId::from_document(&document)?;
        report.scanned += 1;

        if store.contains(collection, &key)? {
            tracing::info!(collection = %collection, key = %key, "already present");
            report.unchanged += 1;
            continue;
        }

        if !options.dry_run {
            store.insert(collection, document)?;
        }
        tracing::info!(collection = %collection, key = %key, "document seeded");
        audit.record(&AuditEntry {
            migration: seed.name(),
            collection,
            key,
            label,
            dry_run: options.dry_run,
        });
        report.migrated += 1;
    }

    if !options.dry_run {
        store.flush()?;
    }
    Ok(report)
}
