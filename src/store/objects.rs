//! Object storage: binary blobs in, durable URLs out.
//!
//! Background removal stores its processed images here under
//! `processed-images/<uuid>.png` and swaps the resulting URL into the layer.

use std::path::PathBuf;

use crate::error::AppError;

/// Blob storage addressed by a relative path, returning a URL that stays
/// valid for the lifetime of the stored object.
pub trait ObjectStore: Send + Sync {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<String, AppError>;
}

/// Object store rooted at a directory on the local filesystem; returned URLs
/// use the `file://` scheme.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location inside the OS data dir, next to the document store.
    pub fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_default()
            .join("moodboard")
            .join("objects")
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<String, AppError> {
        for segment in path.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(AppError::StoreSave(format!(
                    "invalid object path segment '{segment}'"
                )));
            }
        }
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::StoreSave(format!("cannot create object directory: {e}")))?;
        }
        std::fs::write(&target, bytes)
            .map_err(|e| AppError::StoreSave(format!("cannot store object: {e}")))?;
        Ok(format!("file://{}", target.display()))
    }
}
