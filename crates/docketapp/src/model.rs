//! # Domain Model
//!
//! [`Document`] and [`Author`] are the only persisted types.
//!
//! ## What Goes Where
//!
//! A document is stored in two places:
//!
//! - **Metadata Store**: `id`, `title`, `author` and `created`, one JSON record per
//!   document. This is what listing and the structural search filters work on.
//! - **Content Store**: the body text, one file per document.
//!
//! `content` is marked `#[serde(skip)]`, so it is never written to the metadata file and
//! is dropped if an old metadata file happens to carry it. The body is only ever read
//! back from its content file ("hydration").
//!
//! ## Timestamps
//!
//! `created` is written as `YYYY-MM-DD HH:MM:SS` in UTC, so it has whole-second
//! precision on disk. The store stamps it itself (see [`crate::clock`]); a value set by
//! the caller is not trusted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk format of `created`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// Authors are the same author when their ids match, whatever the display name says.
impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Author {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Empty until the store assigns one.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(skip)]
    pub content: String,
    pub author: Author,
    #[serde(default, with = "created_format")]
    pub created: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            content: content.into(),
            author,
            created: None,
        }
    }

    /// Request a specific id. The store only keeps it if no other record uses it.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp in the metadata format, falling back to RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(naive) => Ok(naive.and_utc()),
        Err(_) => DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc)),
    }
}

mod created_format {
    use super::{format_timestamp, TIMESTAMP_FORMAT};
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT)
                .map(|naive| naive.and_utc())
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
