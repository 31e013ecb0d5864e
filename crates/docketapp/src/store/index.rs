//! The Metadata Store: every document record, in file order.
//!
//! [`MetadataIndex::load`] and [`MetadataIndex::persist`] are the only points where the
//! metadata file is read or written. The index is an owned snapshot; nothing keeps a
//! reference to it between store operations.

use super::backend::StorageBackend;
use crate::error::{DocketError, Result};
use crate::model::Document;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct MetadataIndex {
    records: Vec<Document>,
}

impl MetadataIndex {
    /// Read the metadata file. A missing or blank file is an empty index.
    pub fn load<B: StorageBackend + ?Sized>(backend: &B) -> Result<Self> {
        let Some(raw) = backend.read_index()? else {
            return Ok(Self::default());
        };
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let records: Vec<Document> = serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(error = %e, "metadata file could not be parsed");
            DocketError::Serialization(e)
        })?;
        Ok(Self { records })
    }

    /// Rewrite the metadata file in full.
    pub fn persist<B: StorageBackend + ?Sized>(&self, backend: &B) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.records)?;
        backend.write_index(&raw)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Document] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Document> {
        self.records
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Position of the first record with this id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|doc| doc.id == id)
    }

    /// First record with this id.
    pub fn find(&self, id: &str) -> Option<&Document> {
        self.records.iter().find(|doc| doc.id == id)
    }

    pub fn push(&mut self, document: Document) {
        self.records.push(document);
    }

    /// Swap the record at `position`, returning the previous one.
    pub fn replace(&mut self, position: usize, document: Document) -> Document {
        std::mem::replace(&mut self.records[position], document)
    }

    /// A new UUID that no record uses yet.
    pub fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Author;
    use crate::store::mem_backend::MemBackend;

    fn doc(id: &str, title: &str) -> Document {
        Document::new(title, "", Author::new("a", "A")).with_id(id)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let backend = MemBackend::new();
        let index = MetadataIndex::load(&backend).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_blank_file_is_empty() {
        let backend = MemBackend::new();
        backend.set_raw_index("  \n");
        let index = MetadataIndex::load(&backend).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let backend = MemBackend::new();
        backend.set_raw_index("{ not json");
        let result = MetadataIndex::load(&backend);
        assert!(matches!(result, Err(DocketError::Serialization(_))));
    }

    #[test]
    fn test_persist_then_load_keeps_order() {
        let backend = MemBackend::new();
        let mut index = MetadataIndex::default();
        index.push(doc("2", "second"));
        index.push(doc("1", "first"));
        index.persist(&backend).unwrap();

        let loaded = MetadataIndex::load(&backend).unwrap();
        let ids: Vec<&str> = loaded.records().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut index = MetadataIndex::default();
        index.push(doc("1", "first"));
        index.push(doc("1", "shadowed"));
        assert_eq!(index.find("1").unwrap().title, "first");
        assert_eq!(index.position("1"), Some(0));
        assert!(index.find("2").is_none());
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut index = MetadataIndex::default();
        index.push(doc("1", "old"));
        let previous = index.replace(0, doc("1", "new"));
        assert_eq!(previous.title, "old");
        assert_eq!(index.records()[0].title, "new");
    }

    #[test]
    fn test_fresh_id_is_unused() {
        let mut index = MetadataIndex::default();
        index.push(doc("1", "t"));
        let id = index.fresh_id();
        assert!(!id.is_empty());
        assert!(!index.contains(&id));
    }
}
