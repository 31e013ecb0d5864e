//! # Storage Layer
//!
//! This module defines the storage abstraction for docket. The [`DocumentStore`] trait
//! is what the search engine and the API work against; [`doc_store::DocStore`] is the
//! one implementation, generic over a raw I/O [`backend::StorageBackend`].
//!
//! ## Split Storage
//!
//! 1. **Metadata Store**: one JSON array with a record per document
//!    ([`index::MetadataIndex`]). Loaded in full and rewritten in full.
//! 2. **Content Store**: one plain-text file per document, named by
//!    [`content_key::ContentKey`] from the title and the id.
//!
//! Listing and the structural search filters only read the metadata file; bodies are
//! read on demand.
//!
//! ## Consistency
//!
//! A save writes metadata first and content second. The pair is not atomic, so a failed
//! or interrupted content write leaves a record without a body. Such records are still
//! returned (with empty content) by `find_by_id`, are dropped by content searches, and
//! are reported as `dangling` by [`DocumentStore::verify`].
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `DocStore<FsBackend>`, the production store.
//! - [`memory::InMemoryStore`]: `DocStore<MemBackend>`, for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── docket.toml         # Optional configuration
//! ├── documents.json      # Metadata Store
//! └── storage/
//!     └── {title}_{id}    # Content files
//! ```

use crate::error::Result;
use crate::model::Document;
use std::path::PathBuf;

pub mod backend;
pub mod content_key;
pub mod doc_store;
pub mod fs;
pub mod fs_backend;
pub mod index;
pub mod mem_backend;
pub mod memory;

/// Report from the `verify` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Ids of records whose content file is missing.
    pub dangling: Vec<String>,
    /// Content file names that no record points at.
    pub orphaned: Vec<String>,
    /// Ids carried by more than one record.
    pub duplicate_ids: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.orphaned.is_empty() && self.duplicate_ids.is_empty()
    }
}

/// Abstract interface for document storage.
pub trait DocumentStore {
    /// Persist a document, assigning its id and `created` as needed.
    fn save(&mut self, document: Document) -> Result<Document>;

    /// First document with this id, content hydrated when its file exists.
    fn find_by_id(&self, id: &str) -> Result<Option<Document>>;

    /// All records in metadata order, without content.
    fn list_documents(&self) -> Result<Vec<Document>>;

    /// Body of a document, or `None` when its content file does not exist.
    fn load_content(&self, document: &Document) -> Result<Option<String>>;

    /// Location of a document's content file.
    fn content_path(&self, document: &Document) -> PathBuf;

    /// Check metadata and content against each other without changing anything.
    fn verify(&self) -> Result<ConsistencyReport>;
}
