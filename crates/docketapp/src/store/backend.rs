use super::content_key::ContentKey;
use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while DocStore handles the "what" (identity, timestamps, consistency).
pub trait StorageBackend {
    // --- Metadata Operations ---

    /// Read the raw metadata file.
    /// Returns Ok(None) if it does not exist yet.
    fn read_index(&self) -> Result<Option<String>>;

    /// Replace the metadata file with `raw`.
    fn write_index(&self, raw: &str) -> Result<()>;

    // --- Content Operations ---

    /// Make sure the content directory exists.
    /// Fails with `StorageUnavailable` if it cannot be created.
    fn ensure_content_dir(&self) -> Result<()>;

    /// Check whether a content file exists.
    fn content_exists(&self, key: &ContentKey) -> bool;

    /// Read a content file.
    /// Returns Ok(None) if the file does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_content(&self, key: &ContentKey) -> Result<Option<String>>;

    /// Write a content file, replacing any previous one.
    fn write_content(&self, key: &ContentKey, content: &str) -> Result<()>;

    /// Delete a content file. Missing files are not an error.
    fn delete_content(&self, key: &ContentKey) -> Result<()>;

    /// List every content file the store recognizes.
    fn list_content_keys(&self) -> Result<Vec<ContentKey>>;

    /// Location of a content file.
    /// For FsBackend, this is the real path. For MemBackend, a virtual path.
    fn content_path(&self, key: &ContentKey) -> PathBuf;
}
