use super::doc_store::DocStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = DocStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        DocStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{Author, Document};
    use crate::store::DocumentStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// First `created` handed out by fixture stores.
    pub fn fixture_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    /// An in-memory store whose clock advances one minute per save.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new().with_clock(
                    ManualClock::new(fixture_start()).with_step(Duration::minutes(1)),
                ),
            }
        }

        pub fn with_document(mut self, title: &str, content: &str, author_id: &str) -> Self {
            let author = Author::new(author_id, format!("Author {}", author_id));
            self.store
                .save(Document::new(title, content, author))
                .unwrap();
            self
        }

        /// The four documents of the classic search scenario, authors "1" to "4".
        pub fn with_hello_documents(self) -> Self {
            self.with_document("PrefixHello", "Test data", "1")
                .with_document("AgainHelloAgain", "Test data second", "2")
                .with_document("HelloTripleAgain", "Test data third", "3")
                .with_document("HelloTriplePlusOneAgain", "Test data forth", "4")
        }
    }
}
