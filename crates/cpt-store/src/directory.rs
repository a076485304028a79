//! Directory store
//!
//! Layout: `<data_dir>/<database>/<collection>.json`, one document per line.
//! This is the format `mongoexport --collection <c>` produces (relaxed
//! extended JSON) and `mongoimport --mode upsert` consumes.
//!
//! Collections are read once at open. Upserts change the in-memory copy and
//! mark the collection dirty; [`DocumentStore::flush`] rewrites each dirty
//! collection file once, through a temporary file and a rename. A run that
//! stops before flushing leaves every file as it was, and an interrupted
//! flush leaves either the old or the new file, never a truncated one.

use cpt_document::{Collection, DocumentId};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::store::{DocumentStore, UpsertOutcome};

const LOCK_FILE: &str = ".cpt-migrate.lock";

/// File-backed store, exclusively locked while open
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    documents: MemoryStore,
    dirty: BTreeSet<Collection>,
    _lock: LockFile,
}

impl DirectoryStore {
    /// Open (creating if needed) the database directory and read every
    /// collection file
    ///
    /// # Errors
    /// - `StoreError::Locked` if another run holds the database
    /// - `StoreError::Malformed` / `StoreError::DuplicateKey` for bad files
    /// - `StoreError::Io` on filesystem failures
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let root = config.database_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::io_error(&root, e))?;
        let lock = LockFile::acquire(root.join(LOCK_FILE))?;

        let mut documents = MemoryStore::new();
        for collection in Collection::ALL {
            let path = collection_path(&root, collection);
            let count = read_collection(&path, collection, &mut documents)?;
            tracing::debug!(collection = %collection, count, path = %path.display(), "loaded collection");
        }

        Ok(Self {
            root,
            documents,
            dirty: BTreeSet::new(),
            _lock: lock,
        })
    }

    /// Database directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding a collection
    #[inline]
    #[must_use]
    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        collection_path(&self.root, collection)
    }

    /// Whether a collection has writes that are not on disk yet
    #[inline]
    #[must_use]
    pub fn is_dirty(&self, collection: Collection) -> bool {
        self.dirty.contains(&collection)
    }

    fn write_collection(&self, collection: Collection) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let tmp = path.with_extension("json.tmp");

        let file = File::create(&tmp).map_err(|e| StoreError::io_error(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        for document in self.documents.documents(collection) {
            serde_json::to_writer(&mut writer, document)
                .map_err(|source| StoreError::Serialize { collection, source })?;
            writer
                .write_all(b"\n")
                .map_err(|e| StoreError::io_error(&tmp, e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::io_error(&tmp, e.into_error()))?;
        file.sync_all().map_err(|e| StoreError::io_error(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &path).map_err(|e| StoreError::io_error(&path, e))
    }
}

impl DocumentStore for DirectoryStore {
    fn keys(&self, collection: Collection) -> Result<Vec<DocumentId>, StoreError> {
        self.documents.keys(collection)
    }

    fn get(&self, collection: Collection, key: &DocumentId) -> Result<Option<Value>, StoreError> {
        self.documents.get(collection, key)
    }

    fn contains(&self, collection: Collection, key: &DocumentId) -> Result<bool, StoreError> {
        self.documents.contains(collection, key)
    }

    fn upsert(&mut self, collection: Collection, document: Value) -> Result<UpsertOutcome, StoreError> {
        let outcome = self.documents.upsert(collection, document)?;
        self.dirty.insert(collection);
        Ok(outcome)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        while let Some(collection) = self.dirty.first().copied() {
            self.write_collection(collection)?;
            self.dirty.remove(&collection);
            tracing::debug!(collection = %collection, count = self.documents.len(collection), "flushed collection");
        }
        Ok(())
    }
}

impl Drop for DirectoryStore {
    fn drop(&mut self) {
        if !self.dirty.is_empty() {
            let collections: Vec<&str> = self.dirty.iter().map(|c| c.name()).collect();
            tracing::warn!(?collections, "discarding writes that were never flushed");
        }
    }
}

fn collection_path(root: &Path, collection: Collection) -> PathBuf {
    root.join(format!("{}.json", collection.name()))
}

fn read_collection(
    path: &Path,
    collection: Collection,
    into: &mut MemoryStore,
) -> Result<usize, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(StoreError::io_error(path, e)),
    };

    let mut count = 0;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| StoreError::io_error(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let document: Value = serde_json::from_str(&line).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        into.load(collection, document)?;
        count += 1;
    }
    Ok(count)
}

/// Lock file held for the lifetime of a [`DirectoryStore`]
#[derive(Debug)]
struct LockFile {
    path: PathBuf,
}

impl LockFile {
    fn acquire(path: PathBuf) -> Result<Self, StoreError> {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                writeln!(file, "{}", std::process::id()).map_err(|e| StoreError::io_error(&path, e))?;
                Ok(Self { path })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StoreError::Locked { path }),
            Err(e) => Err(StoreError::io_error(&path, e)),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release database lock");
        }
    }
}
