use super::backend::StorageBackend;
use super::content_key::ContentKey;
use crate::error::{DocketError, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell`/`Cell` for interior mutability since docket is single-threaded,
/// which lets the `StorageBackend` trait use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    index: RefCell<Option<String>>,
    content: RefCell<BTreeMap<ContentKey, String>>,
    fail_index_writes: Cell<bool>,
    fail_content_writes: Cell<bool>,
    fail_content_deletes: Cell<bool>,
    content_dir_unavailable: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `write_index` fail.
    pub fn set_fail_index_writes(&self, fail: bool) {
        self.fail_index_writes.set(fail);
    }

    /// Make `write_content` fail, leaving metadata writes alone.
    pub fn set_fail_content_writes(&self, fail: bool) {
        self.fail_content_writes.set(fail);
    }

    /// Make `delete_content` fail.
    pub fn set_fail_content_deletes(&self, fail: bool) {
        self.fail_content_deletes.set(fail);
    }

    /// Make `ensure_content_dir` report the storage as unavailable.
    pub fn set_content_dir_unavailable(&self, unavailable: bool) {
        self.content_dir_unavailable.set(unavailable);
    }

    /// Raw metadata as last written.
    pub fn raw_index(&self) -> Option<String> {
        self.index.borrow().clone()
    }

    /// Replace the raw metadata, bypassing the store.
    pub fn set_raw_index(&self, raw: &str) {
        *self.index.borrow_mut() = Some(raw.to_string());
    }
}

impl StorageBackend for MemBackend {
    fn read_index(&self) -> Result<Option<String>> {
        Ok(self.index.borrow().clone())
    }

    fn write_index(&self, raw: &str) -> Result<()> {
        if self.fail_index_writes.get() {
            return Err(DocketError::Store("Simulated index write error".to_string()));
        }
        *self.index.borrow_mut() = Some(raw.to_string());
        Ok(())
    }

    fn ensure_content_dir(&self) -> Result<()> {
        if self.content_dir_unavailable.get() {
            return Err(DocketError::StorageUnavailable {
                path: PathBuf::from("memory://storage"),
                source: std::io::Error::other("simulated unavailable storage"),
            });
        }
        Ok(())
    }

    fn content_exists(&self, key: &ContentKey) -> bool {
        self.content.borrow().contains_key(key)
    }

    fn read_content(&self, key: &ContentKey) -> Result<Option<String>> {
        Ok(self.content.borrow().get(key).cloned())
    }

    fn write_content(&self, key: &ContentKey, text: &str) -> Result<()> {
        if self.fail_content_writes.get() {
            return Err(DocketError::Io(std::io::Error::other(
                "simulated content write error",
            )));
        }
        self.content
            .borrow_mut()
            .insert(key.clone(), text.to_string());
        Ok(())
    }

    fn delete_content(&self, key: &ContentKey) -> Result<()> {
        if self.fail_content_deletes.get() {
            return Err(DocketError::Io(std::io::Error::other(
                "simulated content delete error",
            )));
        }
        self.content.borrow_mut().remove(key);
        Ok(())
    }

    fn list_content_keys(&self) -> Result<Vec<ContentKey>> {
        Ok(self.content.borrow().keys().cloned().collect())
    }

    fn content_path(&self, key: &ContentKey) -> PathBuf {
        PathBuf::from(format!("memory://storage/{}", key))
    }
}
