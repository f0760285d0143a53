//! Persistence collaborators.
//!
//! The editor core talks to storage through two narrow traits so the engine
//! stays testable and the backing service swappable:
//!
//! - [`DocumentStore`] — JSON documents addressed by a hierarchical
//!   collection path plus an id (`user/{uid}/drafts`, `publicCollages`, ...),
//!   with read-one / write-whole / delete-one semantics.
//! - [`objects::ObjectStore`] — binary blobs addressed by path, returning a
//!   durable URL.
//!
//! The default implementations in [`fs`] and [`objects`] keep everything
//! under the OS data dir.

pub mod fs;
pub mod objects;

pub use fs::FsDocumentStore;
pub use objects::{FsObjectStore, ObjectStore};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;

/// Document read/write/delete within a hierarchical namespace.
///
/// `collection` is a slash-separated path (e.g. `user/abc/drafts`); `id` is a
/// single path segment. Writes replace the whole document.
pub trait DocumentStore: Send + Sync {
    /// Read one document, `Ok(None)` when it does not exist.
    fn read(&self, collection: &str, id: &str) -> Result<Option<serde_json::Value>, AppError>;

    /// Write (create or replace) one document.
    fn write(&self, collection: &str, id: &str, doc: &serde_json::Value)
        -> Result<(), AppError>;

    /// Create a document under a generated id and return the id.
    fn create(&self, collection: &str, doc: &serde_json::Value) -> Result<String, AppError>;

    /// Delete one document. Deleting a missing document is not an error.
    fn delete(&self, collection: &str, id: &str) -> Result<(), AppError>;
}

/// Read and deserialize one document.
pub fn read_doc<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, AppError> {
    match store.read(collection, id)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| AppError::StoreLoad(format!("cannot parse {collection}/{id}: {e}"))),
        None => Ok(None),
    }
}

/// Serialize and write one document.
pub fn write_doc<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    doc: &T,
) -> Result<(), AppError> {
    let value = serde_json::to_value(doc)
        .map_err(|e| AppError::StoreSave(format!("cannot serialize {collection}/{id}: {e}")))?;
    store.write(collection, id, &value)
}

/// Serialize and create one document under a generated id.
pub fn create_doc<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    doc: &T,
) -> Result<String, AppError> {
    let value = serde_json::to_value(doc)
        .map_err(|e| AppError::StoreSave(format!("cannot serialize new {collection} doc: {e}")))?;
    store.create(collection, &value)
}
