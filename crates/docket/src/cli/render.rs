//! # Rendering Module
//!
//! Turns API results into text for the terminal or JSON for scripts. Every function
//! returns a `String`; printing is left to the command handlers.
//!
//! Layout (width, truncation, padding) is computed with `unicode-width` so titles with
//! wide characters still line up.

use super::styles;
use chrono::{DateTime, Utc};
use docketapp::model::{format_timestamp, Document};
use docketapp::store::ConsistencyReport;
use serde::Serialize;
use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ID_WIDTH: usize = 10;
pub const TITLE_WIDTH: usize = 40;
pub const AUTHOR_WIDTH: usize = 16;

/// JSON shape of a document. Unlike the metadata record it can carry the body.
#[derive(Serialize)]
pub struct DocumentView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub author: AuthorView<'a>,
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

#[derive(Serialize)]
pub struct AuthorView<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

#[derive(Serialize)]
struct ReportView<'a> {
    clean: bool,
    dangling: &'a [String],
    orphaned: &'a [String],
    duplicate_ids: &'a [String],
}

impl<'a> DocumentView<'a> {
    pub fn new(document: &'a Document, with_content: bool) -> Self {
        Self {
            id: &document.id,
            title: &document.title,
            author: AuthorView {
                id: &document.author.id,
                name: &document.author.name,
            },
            created: document.created.as_ref().map(format_timestamp),
            content: with_content.then_some(document.content.as_str()),
        }
    }
}

pub fn documents_json(documents: &[Document], with_content: bool) -> serde_json::Result<String> {
    let views: Vec<DocumentView> = documents
        .iter()
        .map(|d| DocumentView::new(d, with_content))
        .collect();
    serde_json::to_string_pretty(&views)
}

pub fn document_json(document: &Document) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DocumentView::new(document, true))
}

pub fn report_json(report: &ConsistencyReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportView {
        clean: report.is_clean(),
        dangling: &report.dangling,
        orphaned: &report.orphaned,
        duplicate_ids: &report.duplicate_ids,
    })
}

/// One line per document: id, title, author, age.
pub fn render_list(documents: &[Document], now: DateTime<Utc>) -> String {
    if documents.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No documents."));
    }

    let mut output = String::new();
    for document in documents {
        let id = pad_to_width(&truncate_to_width(&document.id, ID_WIDTH), ID_WIDTH);
        let title = pad_to_width(&truncate_to_width(&document.title, TITLE_WIDTH), TITLE_WIDTH);
        let author = pad_to_width(
            &truncate_to_width(&document.author.name, AUTHOR_WIDTH),
            AUTHOR_WIDTH,
        );
        let age = document
            .created
            .map(|created| format_time_ago(created, now))
            .unwrap_or_default();

        output.push_str(&format!(
            "{}  {}  {}  {}\n",
            styles::id().apply_to(id),
            styles::title().apply_to(title),
            styles::author().apply_to(author),
            styles::time().apply_to(age),
        ));
    }
    output
}

/// Header block followed by the body.
pub fn render_full(document: &Document, content_path: &Path) -> String {
    let created = document
        .created
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "unknown".to_string());

    let mut output = String::new();
    output.push_str(&format!("{}\n", styles::title().apply_to(&document.title)));
    output.push_str(&format!(
        "{} {}\n",
        styles::muted().apply_to("id:     "),
        styles::id().apply_to(&document.id)
    ));
    output.push_str(&format!(
        "{} {} ({})\n",
        styles::muted().apply_to("author: "),
        styles::author().apply_to(&document.author.name),
        document.author.id
    ));
    output.push_str(&format!(
        "{} {}\n",
        styles::muted().apply_to("created:"),
        styles::time().apply_to(created)
    ));
    output.push_str(&format!(
        "{} {}\n\n",
        styles::muted().apply_to("file:   "),
        content_path.display()
    ));
    output.push_str(&document.content);
    if !document.content.ends_with('\n') {
        output.push('\n');
    }
    output
}

pub fn render_saved(document: &Document) -> String {
    format!(
        "Saved {} as {}\n",
        styles::title().apply_to(&document.title),
        styles::id().apply_to(&document.id)
    )
}

pub fn render_report(report: &ConsistencyReport) -> String {
    if report.is_clean() {
        return format!("{}\n", styles::ok().apply_to("Store is consistent."));
    }

    let mut output = String::new();
    let sections = [
        ("Records without content", &report.dangling),
        ("Content without records", &report.orphaned),
        ("Duplicate ids", &report.duplicate_ids),
    ];
    for (heading, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        output.push_str(&format!(
            "{} ({}):\n",
            styles::problem().apply_to(heading),
            entries.len()
        ));
        for entry in entries.iter() {
            output.push_str(&format!("  {}\n", entry));
        }
    }
    output
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
