//! Filesystem-backed document store.
//!
//! One JSON file per document: `<root>/<collection path>/<id>.json`. Writes
//! go to a `.tmp` sibling first and are renamed over the target, so a crash
//! mid-write never leaves a half-written document behind.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::AppError;
use crate::store::DocumentStore;

/// Document store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default store location inside the OS data dir:
    ///   Linux    ~/.local/share/moodboard/store
    ///   macOS    ~/Library/Application Support/moodboard/store
    ///   Windows  %LOCALAPPDATA%\moodboard\store
    pub fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_default()
            .join("moodboard")
            .join("store")
    }

    fn doc_path(&self, collection: &str, id: &str) -> Result<PathBuf, AppError> {
        let mut path = self.root.clone();
        for segment in collection.split('/') {
            path.push(checked_segment(segment)?);
        }
        path.push(format!("{}.json", checked_segment(id)?));
        Ok(path)
    }
}

/// Reject path segments that could escape the store root. Collection paths
/// are assembled from fixed patterns plus user/document ids, so anything
/// containing a separator or dot-dot is a caller bug, not user input.
fn checked_segment(segment: &str) -> Result<&str, AppError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
    {
        return Err(AppError::Io(format!(
            "invalid document path segment '{segment}'"
        )));
    }
    Ok(segment)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::StoreSave(format!("cannot create store directory: {e}")))?;
    }
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    if let Err(e) = std::fs::write(&tmp_path, contents) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(AppError::StoreSave(format!("cannot write document: {e}")));
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        AppError::StoreSave(format!("rename to final path failed: {e}"))
    })
}

impl DocumentStore for FsDocumentStore {
    fn read(&self, collection: &str, id: &str) -> Result<Option<serde_json::Value>, AppError> {
        let path = self.doc_path(collection, id)?;
        let json = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::StoreLoad(format!(
                    "cannot read {collection}/{id}: {e}"
                )))
            }
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| AppError::StoreLoad(format!("cannot parse {collection}/{id}: {e}")))
    }

    fn write(
        &self,
        collection: &str,
        id: &str,
        doc: &serde_json::Value,
    ) -> Result<(), AppError> {
        let path = self.doc_path(collection, id)?;
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| AppError::StoreSave(format!("cannot serialize document: {e}")))?;
        write_atomic(&path, &json)
    }

    fn create(&self, collection: &str, doc: &serde_json::Value) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();
        self.write(collection, &id, doc)?;
        Ok(id)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        let path = self.doc_path(collection, id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Deleting a missing document is idempotent; the publish flow may
            // retry the draft cleanup after a crash between its two steps.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::StoreSave(format!(
                "cannot delete {collection}/{id}: {e}"
            ))),
        }
    }
}
