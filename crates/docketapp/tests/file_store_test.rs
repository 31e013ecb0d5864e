use docketapp::config::{ConflictPolicy, DocketConfig, CONFIG_FILENAME};
use docketapp::error::DocketError;
use docketapp::model::{Author, Document};
use docketapp::search::{self, SearchRequest};
use docketapp::store::fs::FileStore;
use docketapp::store::DocumentStore;
use std::fs;
use tempfile::TempDir;

fn save_hello_documents(store: &mut FileStore) -> Vec<Document> {
    [
        ("1", "PrefixHello", "Test data"),
        ("2", "AgainHelloAgain", "Test data second"),
        ("3", "HelloTripleAgain", "Test data third"),
        ("4", "HelloTriplePlusOneAgain", "Test data forth"),
    ]
    .into_iter()
    .map(|(id, title, content)| {
        let author = Author::new(id, format!("Author {}", id));
        store
            .save(Document::new(title, content, author).with_id(id))
            .unwrap()
    })
    .collect()
}

#[test]
fn test_end_to_end_content_search() {
    let root = TempDir::new().unwrap();
    let mut store = FileStore::new(root.path());
    let saved = save_hello_documents(&mut store);

    let request = SearchRequest::new().with_content("data").with_content("forth");
    let results = search::run(&store, &request).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, saved[3].id);
    assert_eq!(results[0].title, "HelloTriplePlusOneAgain");
    assert_eq!(results[0].content, "Test data forth");
}

#[test]
fn test_find_by_id_after_reopen() {
    let root = TempDir::new().unwrap();
    {
        let mut store = FileStore::new(root.path());
        save_hello_documents(&mut store);
    }

    let store = FileStore::new(root.path());
    let found = store.find_by_id("1").unwrap().unwrap();
    assert_eq!(found.title, "PrefixHello");
    assert_eq!(found.author, Author::new("1", "Author 1"));
    assert_eq!(found.content, "Test data");
    assert!(found.created.is_some());
}

#[test]
fn test_duplicate_ids_on_disk_get_new_ids() {
    let root = TempDir::new().unwrap();
    let mut store = FileStore::new(root.path());
    let author = Author::new("1", "Author");

    let first = store
        .save(Document::new("One", "a", author.clone()).with_id("same"))
        .unwrap();
    let second = store
        .save(Document::new("Two", "b", author).with_id("same"))
        .unwrap();

    assert_ne!(first.id, second.id);
    let ids: Vec<String> = store
        .list_documents()
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn test_metadata_file_has_no_content() {
    let root = TempDir::new().unwrap();
    let mut store = FileStore::new(root.path());
    store
        .save(Document::new("Secret", "body text", Author::new("1", "A")).with_id("1"))
        .unwrap();

    let raw = fs::read_to_string(root.path().join("documents.json")).unwrap();
    assert!(!raw.contains("body text"));

    let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(records[0]["id"], "1");
    assert_eq!(records[0]["author"]["name"], "A");
    assert!(records[0]["created"].is_string());
}

#[test]
fn test_hand_edited_metadata_is_readable() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("documents.json"),
        r#"[{"id":"7","title":"Legacy","content":"ignored","author":{"id":"9","name":"Old"},"created":"2023-12-31 23:59:59"}]"#,
    )
    .unwrap();
    fs::create_dir(root.path().join("storage")).unwrap();
    fs::write(root.path().join("storage").join("Legacy_7"), "real body").unwrap();

    let store = FileStore::new(root.path());
    let found = store.find_by_id("7").unwrap().unwrap();
    assert_eq!(found.content, "real body");

    let request = SearchRequest::new().with_author("9").with_content("real");
    assert_eq!(search::run(&store, &request).unwrap().len(), 1);
}

#[test]
fn test_storage_unavailable_aborts_save() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("storage"), "not a directory").unwrap();

    let mut store = FileStore::new(root.path());
    let result = store.save(Document::new("T", "c", Author::new("1", "A")));

    assert!(matches!(
        result,
        Err(DocketError::StorageUnavailable { .. })
    ));
    assert!(!root.path().join("documents.json").exists());
}

#[test]
fn test_open_reads_config_file() {
    let root = TempDir::new().unwrap();
    let config = DocketConfig {
        metadata_file: "index.json".to_string(),
        content_dir: "bodies".to_string(),
        on_conflict: Some(ConflictPolicy::Replace),
    };
    fs::write(
        root.path().join(CONFIG_FILENAME),
        toml::to_string(&config).unwrap(),
    )
    .unwrap();

    let mut store = FileStore::open(root.path()).unwrap();
    assert_eq!(store.policy(), ConflictPolicy::Replace);

    let author = Author::new("1", "A");
    store
        .save(Document::new("Draft", "v1", author.clone()).with_id("x"))
        .unwrap();
    store
        .save(Document::new("Draft", "v2", author).with_id("x"))
        .unwrap();

    assert!(root.path().join("index.json").exists());
    assert_eq!(store.list_documents().unwrap().len(), 1);
    assert_eq!(
        fs::read_to_string(root.path().join("bodies").join("Draft_x")).unwrap(),
        "v2"
    );
}

#[test]
fn test_open_without_config_uses_defaults() {
    let root = TempDir::new().unwrap();
    let store = FileStore::open(root.path()).unwrap();
    assert_eq!(store.policy(), ConflictPolicy::Reassign);
}

#[test]
fn test_verify_finds_dangling_record() {
    let root = TempDir::new().unwrap();
    let mut store = FileStore::new(root.path());
    let saved = store
        .save(Document::new("Gone", "soon", Author::new("1", "A")))
        .unwrap();
    fs::remove_file(store.content_path(&saved)).unwrap();

    let report = store.verify().unwrap();
    assert_eq!(report.dangling, vec![saved.id]);
    assert!(report.orphaned.is_empty());
}

#[test]
fn test_long_non_ascii_title_saves_cleanly() {
    let root = TempDir::new().unwrap();
    let mut store = FileStore::new(root.path());
    let title = "Отчёт о проделанной работе за третий квартал года";

    let saved = store
        .save(Document::new(title, "квартальные итоги", Author::new("1", "A")))
        .unwrap();

    let found = store.find_by_id(&saved.id).unwrap().unwrap();
    assert_eq!(found.title, title);
    assert_eq!(found.content, "квартальные итоги");
    assert!(store.verify().unwrap().is_clean());
}

#[test]
fn test_invalid_utf8_body_does_not_break_search() {
    let root = TempDir::new().unwrap();
    let mut store = FileStore::new(root.path());
    let author = Author::new("1", "A");
    let broken = store
        .save(Document::new("Broken", "placeholder", author.clone()).with_id("b"))
        .unwrap();
    store
        .save(Document::new("Fine", "needle here", author).with_id("f"))
        .unwrap();
    fs::write(store.content_path(&broken), b"needle \xff\xfe").unwrap();

    let request = SearchRequest::new().with_content("needle");
    let results = search::run(&store, &request).unwrap();
    let ids: Vec<&str> = results.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "f"]);

    let found = store.find_by_id("b").unwrap().unwrap();
    assert!(found.content.starts_with("needle "));
}
