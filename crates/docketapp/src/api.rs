//! # API Facade
//!
//! The API layer is a **thin facade** over the store and the search engine. It is the
//! single entry point for docket operations, regardless of the UI being used.
//!
//! The API does not format output, touch stdout/stderr or decide exit codes; it
//! returns plain data and [`crate::error::Result`].
//!
//! ## Generic Over DocumentStore
//!
//! `DocketApi<S: DocumentStore>` is generic over the storage:
//! - Production: `DocketApi<FileStore>`
//! - Testing: `DocketApi<InMemoryStore>`

use crate::error::Result;
use crate::model::Document;
use crate::search::{self, SearchRequest};
use crate::store::{ConsistencyReport, DocumentStore};
use std::path::PathBuf;

/// The main API facade for docket operations.
pub struct DocketApi<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> DocketApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, document: Document) -> Result<Document> {
        self.store.save(document)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        self.store.find_by_id(id)
    }

    pub fn search(&self, request: &SearchRequest) -> Result<Vec<Document>> {
        search::run(&self.store, request)
    }

    pub fn list(&self) -> Result<Vec<Document>> {
        self.store.list_documents()
    }

    pub fn verify(&self) -> Result<ConsistencyReport> {
        self.store.verify()
    }

    pub fn content_path(&self, document: &Document) -> PathBuf {
        self.store.content_path(document)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub use crate::config::{ConflictPolicy, DocketConfig};
pub use crate::model::Author;
