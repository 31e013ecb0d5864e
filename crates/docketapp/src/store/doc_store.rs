use super::backend::StorageBackend;
use super::content_key::{ContentKey, MAX_NAME_LEN};
use super::index::MetadataIndex;
use super::{ConsistencyReport, DocumentStore};
use crate::clock::{Clock, SystemClock};
use crate::config::ConflictPolicy;
use crate::error::{DocketError, Result};
use crate::model::Document;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub struct DocStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    policy: ConflictPolicy,
    clock: Box<dyn Clock>,
}

impl<B: StorageBackend> DocStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            policy: ConflictPolicy::default(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Settle the id and `created` of an incoming document against the index.
    /// Returns the record it replaces, if any.
    fn admit(&self, index: &mut MetadataIndex, document: &mut Document) -> Option<Document> {
        let existing = if document.id.is_empty() {
            None
        } else {
            index.position(&document.id)
        };

        match (existing, self.policy) {
            (Some(position), ConflictPolicy::Replace) => {
                document.created = index.records()[position]
                    .created
                    .or_else(|| Some(self.clock.now()));
                debug!(id = %document.id, "replacing existing record");
                Some(index.replace(position, document.clone()))
            }
            (existing, _) => {
                if existing.is_some() {
                    let fresh = index.fresh_id();
                    debug!(requested = %document.id, assigned = %fresh, "id already taken, reassigning");
                    document.id = fresh;
                } else if document.id.is_empty() {
                    document.id = index.fresh_id();
                }
                document.created = Some(self.clock.now());
                index.push(document.clone());
                None
            }
        }
    }
}

impl<B: StorageBackend> DocumentStore for DocStore<B> {
    fn save(&mut self, mut document: Document) -> Result<Document> {
        // Nothing is written unless the content directory is usable.
        self.backend.ensure_content_dir()?;

        let mut index = MetadataIndex::load(&self.backend)?;
        let replaced = self.admit(&mut index, &mut document);

        // The content file name must be usable before the record is written.
        let key = ContentKey::for_document(&document);
        if key.as_str().len() > MAX_NAME_LEN {
            return Err(DocketError::Store(format!(
                "content file name for '{}' is too long",
                document.id
            )));
        }

        // 1. Metadata
        index.persist(&self.backend)?;

        // 2. Content
        if let Err(e) = self.backend.write_content(&key, &document.content) {
            warn!(id = %document.id, error = %e, "metadata saved but content write failed");
            return Err(e);
        }

        // A stale file left behind here shows up as orphaned in `verify`.
        if let Some(previous) = replaced {
            let old_key = ContentKey::for_document(&previous);
            if old_key != key {
                if let Err(e) = self.backend.delete_content(&old_key) {
                    warn!(id = %document.id, file = %old_key, error = %e, "could not remove previous content file");
                }
            }
        }

        info!(id = %document.id, title = %document.title, "saved document");
        Ok(document)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        let index = MetadataIndex::load(&self.backend)?;
        let Some(mut document) = index.find(id).cloned() else {
            return Ok(None);
        };

        match self.load_content(&document)? {
            Some(content) => document.content = content,
            None => debug!(id, "content file missing, returning empty content"),
        }
        Ok(Some(document))
    }

    fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(MetadataIndex::load(&self.backend)?.into_records())
    }

    fn load_content(&self, document: &Document) -> Result<Option<String>> {
        self.backend
            .read_content(&ContentKey::for_document(document))
    }

    fn content_path(&self, document: &Document) -> PathBuf {
        self.backend
            .content_path(&ContentKey::for_document(document))
    }

    fn verify(&self) -> Result<ConsistencyReport> {
        let index = MetadataIndex::load(&self.backend)?;
        let mut report = ConsistencyReport::default();

        let mut seen = HashSet::new();
        let mut duplicates = BTreeSet::new();
        let mut referenced = HashSet::new();

        for document in index.records() {
            if !seen.insert(document.id.as_str()) {
                duplicates.insert(document.id.clone());
            }
            let key = ContentKey::for_document(document);
            if !self.backend.content_exists(&key) {
                report.dangling.push(document.id.clone());
            }
            referenced.insert(key);
        }

        report.orphaned = self
            .backend
            .list_content_keys()?
            .into_iter()
            .filter(|key| !referenced.contains(key))
            .map(|key| key.as_str().to_string())
            .collect();
        report.duplicate_ids = duplicates.into_iter().collect();

        if !report.is_clean() {
            warn!(
                dangling = report.dangling.len(),
                orphaned = report.orphaned.len(),
                duplicates = report.duplicate_ids.len(),
                "store is inconsistent"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::DocketError;
    use crate::model::Author;
    use crate::store::mem_backend::MemBackend;
    use chrono::{Duration, TimeZone, Utc};

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn make_store() -> DocStore<MemBackend> {
        DocStore::with_backend(MemBackend::new())
            .with_clock(ManualClock::new(start()).with_step(Duration::seconds(1)))
    }

    fn doc(title: &str, content: &str) -> Document {
        Document::new(title, content, Author::new("1", "Author"))
    }

    // --- Identity Tests ---

    #[test]
    fn test_save_assigns_id_when_missing() {
        let mut store = make_store();
        let saved = store.save(doc("Title", "Body")).unwrap();
        assert!(!saved.id.is_empty());
    }

    #[test]
    fn test_save_keeps_unused_caller_id() {
        let mut store = make_store();
        let saved = store.save(doc("Title", "Body").with_id("1")).unwrap();
        assert_eq!(saved.id, "1");
    }

    #[test]
    fn test_save_reassigns_taken_id() {
        let mut store = make_store();
        let first = store.save(doc("First", "a").with_id("1")).unwrap();
        let second = store.save(doc("Second", "b").with_id("1")).unwrap();

        assert_eq!(first.id, "1");
        assert_ne!(second.id, "1");

        let all = store.list_documents().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.find_by_id("1").unwrap().unwrap().title, "First");
        assert_eq!(
            store.find_by_id(&second.id).unwrap().unwrap().title,
            "Second"
        );
    }

    // --- Created Tests ---

    #[test]
    fn test_save_stamps_created_before_persisting() {
        let mut store = make_store();
        let saved = store.save(doc("Title", "Body")).unwrap();
        assert_eq!(saved.created, Some(start()));

        let loaded = store.find_by_id(&saved.id).unwrap().unwrap();
        assert_eq!(loaded.created, Some(start()));
    }

    #[test]
    fn test_caller_created_is_ignored() {
        let mut store = make_store();
        let mut incoming = doc("Title", "Body");
        incoming.created = Some(start() - Duration::days(365));

        let saved = store.save(incoming).unwrap();
        assert_eq!(saved.created, Some(start()));
    }

    // --- Replace Policy Tests ---

    #[test]
    fn test_replace_policy_updates_in_place() {
        let mut store = make_store().with_policy(ConflictPolicy::Replace);
        store.save(doc("Keep", "k").with_id("0")).unwrap();
        let original = store.save(doc("Old", "old body").with_id("1")).unwrap();
        let updated = store.save(doc("New", "new body").with_id("1")).unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(updated.created, original.created);

        let all = store.list_documents().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].title, "New");

        let loaded = store.find_by_id("1").unwrap().unwrap();
        assert_eq!(loaded.content, "new body");
    }

    #[test]
    fn test_replace_policy_removes_stale_content_file() {
        let mut store = make_store().with_policy(ConflictPolicy::Replace);
        store.save(doc("Old", "old").with_id("1")).unwrap();
        store.save(doc("New", "new").with_id("1")).unwrap();

        assert!(!store.backend.content_exists(&ContentKey::new("Old", "1")));
        assert!(store.backend.content_exists(&ContentKey::new("New", "1")));
        assert!(store.verify().unwrap().is_clean());
    }

    #[test]
    fn test_replace_succeeds_when_stale_file_cannot_be_removed() {
        let mut store = make_store().with_policy(ConflictPolicy::Replace);
        store.save(doc("Old", "old").with_id("1")).unwrap();
        store.backend.set_fail_content_deletes(true);

        let updated = store.save(doc("New", "new").with_id("1")).unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(store.find_by_id("1").unwrap().unwrap().content, "new");

        let report = store.verify().unwrap();
        assert_eq!(report.orphaned, vec!["Old_1".to_string()]);
        assert!(report.dangling.is_empty());
    }

    #[test]
    fn test_long_non_ascii_title_round_trips() {
        let mut store = make_store();
        let title = "Отчёт о проделанной работе за третий квартал года";
        let saved = store.save(doc(title, "итоги")).unwrap();

        let key = ContentKey::for_document(&saved);
        assert!(key.as_str().len() <= MAX_NAME_LEN);
        let loaded = store.find_by_id(&saved.id).unwrap().unwrap();
        assert_eq!(loaded.title, title);
        assert_eq!(loaded.content, "итоги");
        assert!(store.verify().unwrap().is_clean());
    }

    // --- Find Tests ---

    #[test]
    fn test_find_round_trips() {
        let mut store = make_store();
        let saved = store.save(doc("Title", "Some\nmulti-line body\n")).unwrap();

        let found = store.find_by_id(&saved.id).unwrap().unwrap();
        assert_eq!(found.title, saved.title);
        assert_eq!(found.author, saved.author);
        assert_eq!(found.content, "Some\nmulti-line body\n");
    }

    #[test]
    fn test_find_unknown_id_is_none() {
        let store = make_store();
        assert!(store.find_by_id("nope").unwrap().is_none());
    }

    #[test]
    fn test_find_without_content_file_returns_empty_content() {
        let mut store = make_store();
        let saved = store.save(doc("Title", "Body")).unwrap();
        store
            .backend
            .delete_content(&ContentKey::for_document(&saved))
            .unwrap();

        let found = store.find_by_id(&saved.id).unwrap().unwrap();
        assert_eq!(found.content, "");
    }

    // --- Error Handling Tests ---

    #[test]
    fn test_unavailable_storage_writes_nothing() {
        let backend = MemBackend::new();
        backend.set_content_dir_unavailable(true);
        let mut store = DocStore::with_backend(backend);

        let result = store.save(doc("Title", "Body"));
        assert!(matches!(
            result,
            Err(DocketError::StorageUnavailable { .. })
        ));
        assert!(store.backend.raw_index().is_none());
    }

    #[test]
    fn test_content_write_failure_leaves_dangling_record() {
        let mut store = make_store();
        store.backend.set_fail_content_writes(true);

        let result = store.save(doc("Title", "Body").with_id("1"));
        assert!(matches!(result, Err(DocketError::Io(_))));

        // Metadata already went through.
        let found = store.find_by_id("1").unwrap().unwrap();
        assert_eq!(found.content, "");
        assert_eq!(store.verify().unwrap().dangling, vec!["1".to_string()]);
    }

    #[test]
    fn test_index_write_failure_is_reported() {
        let mut store = make_store();
        store.backend.set_fail_index_writes(true);
        assert!(store.save(doc("Title", "Body")).is_err());
        assert!(store.list_documents().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_metadata_is_not_an_empty_store() {
        let store = make_store();
        store.backend.set_raw_index("[{ broken");
        assert!(store.list_documents().is_err());
        assert!(store.find_by_id("1").is_err());
    }

    // --- Verify Tests ---

    #[test]
    fn test_verify_clean_store() {
        let mut store = make_store();
        store.save(doc("A", "a")).unwrap();
        store.save(doc("B", "b")).unwrap();
        assert!(store.verify().unwrap().is_clean());
    }

    #[test]
    fn test_verify_reports_orphans_and_duplicates() {
        let store = make_store();
        store.backend.set_raw_index(
            r#"[
                {"id":"1","title":"A","author":{"id":"1","name":"x"},"created":null},
                {"id":"1","title":"B","author":{"id":"1","name":"x"},"created":null}
            ]"#,
        );
        store
            .backend
            .write_content(&ContentKey::new("A", "1"), "a")
            .unwrap();
        store
            .backend
            .write_content(&ContentKey::new("B", "1"), "b")
            .unwrap();
        store
            .backend
            .write_content(&ContentKey::new("Lost", "9"), "lost")
            .unwrap();

        let report = store.verify().unwrap();
        assert_eq!(report.duplicate_ids, vec!["1".to_string()]);
        assert_eq!(report.orphaned, vec!["Lost_9".to_string()]);
        assert!(report.dangling.is_empty());
    }
}
