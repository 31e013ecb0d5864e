//! # Search
//!
//! A search is an ordered chain of independent filters over the metadata list:
//!
//! 1. **Created**: strictly after `created_from`, strictly before `created_to`.
//! 2. **Title prefix**: title starts with *any* of the prefixes.
//! 3. **Author**: author id is *any* of the ids.
//! 4. **Content**: body contains *every* word.
//!
//! An empty filter value leaves the working set untouched, so an empty request returns
//! every document. Matching is case-sensitive throughout.
//!
//! The first three stages only look at metadata. Bodies are read for the content stage
//! alone, and only for the documents that survived the cheaper stages; documents whose
//! content file is missing drop out there. Filtering is stable: results come back in
//! metadata-file order.

use crate::error::Result;
use crate::model::Document;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub title_prefixes: Vec<String>,
    pub contains_contents: Vec<String>,
    pub author_ids: Vec<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.title_prefixes.push(prefix.into());
        self
    }

    pub fn with_content(mut self, word: impl Into<String>) -> Self {
        self.contains_contents.push(word.into());
        self
    }

    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_ids.push(author_id.into());
        self
    }

    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }
}

pub fn run<S: DocumentStore + ?Sized>(store: &S, request: &SearchRequest) -> Result<Vec<Document>> {
    let documents = store.list_documents()?;
    let total = documents.len();

    let documents = filter_by_created(documents, request.created_from, request.created_to);
    let documents = filter_by_title_prefixes(documents, &request.title_prefixes);
    let documents = filter_by_author_ids(documents, &request.author_ids);
    let documents = filter_by_contents(documents, &request.contains_contents, |doc| {
        store.load_content(doc)
    })?;

    tracing::debug!(total, matched = documents.len(), "search finished");
    Ok(documents)
}

/// Both bounds are exclusive. Documents without a `created` fail any bound that is set.
pub fn filter_by_created(
    documents: Vec<Document>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Vec<Document> {
    if from.is_none() && to.is_none() {
        return documents;
    }
    documents
        .into_iter()
        .filter(|doc| {
            let Some(created) = doc.created else {
                return false;
            };
            to.map_or(true, |to| created < to) && from.map_or(true, |from| created > from)
        })
        .collect()
}

pub fn filter_by_title_prefixes(documents: Vec<Document>, prefixes: &[String]) -> Vec<Document> {
    if prefixes.is_empty() {
        return documents;
    }
    documents
        .into_iter()
        .filter(|doc| {
            prefixes
                .iter()
                .any(|prefix| doc.title.starts_with(prefix.as_str()))
        })
        .collect()
}

pub fn filter_by_author_ids(documents: Vec<Document>, author_ids: &[String]) -> Vec<Document> {
    if author_ids.is_empty() {
        return documents;
    }
    documents
        .into_iter()
        .filter(|doc| author_ids.contains(&doc.author.id))
        .collect()
}

/// Hydrate each candidate with `hydrate` and keep those containing every word.
/// `hydrate` returning `None` (no content file) drops the document.
pub fn filter_by_contents<F>(
    documents: Vec<Document>,
    words: &[String],
    mut hydrate: F,
) -> Result<Vec<Document>>
where
    F: FnMut(&Document) -> Result<Option<String>>,
{
    if words.is_empty() {
        return Ok(documents);
    }

    let mut matched = Vec::new();
    for mut doc in documents {
        let Some(content) = hydrate(&doc)? else {
            tracing::debug!(id = %doc.id, "no content file, skipping");
            continue;
        };
        if words.iter().all(|word| content.contains(word.as_str())) {
            doc.content = content;
            matched.push(doc);
        }
    }
    Ok(matched)
}
