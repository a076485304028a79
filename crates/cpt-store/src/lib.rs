//! CPT Document Stores
//!
//! The storage seam maintenance tools are handed. A store is opened before a
//! run, passed explicitly into the runner, and released when it goes out of
//! scope.
//!
//! - [`DocumentStore`]: key listing, lookup and upsert per collection, and a
//!   flush that makes a run's writes durable
//! - [`DocumentStoreExt`]: typed load/save on top of any store
//! - [`MemoryStore`]: ordered in-memory collections
//! - [`DirectoryStore`]: one JSON-Lines file per collection, the format
//!   `mongoexport` writes and `mongoimport` reads

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod directory;
mod error;
mod memory;
mod store;

pub use config::StoreConfig;
pub use directory::DirectoryStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{DocumentStore, DocumentStoreExt, UpsertOutcome};
