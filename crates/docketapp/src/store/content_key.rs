//! Content file naming.
//!
//! A content file is named `{title}_{id}`. Each half is percent-encoded, and `_`, `.` and
//! `~` are escaped on top of that, so:
//!
//! - the single `_` is always the separator and names can be split back apart,
//! - titles or ids containing `/`, `_` or other awkward characters cannot collide or
//!   escape the content directory,
//! - a name never starts with `.`, which is left to temporary files.
//!
//! Percent-encoding triples every non-ASCII byte, so a half whose encoding is longer
//! than [`MAX_PART_LEN`] is cut and tagged with `~` plus a SHA-256 prefix of the full
//! raw value. `~` never appears in an unshortened half, which keeps shortened and
//! plain names apart; two values sharing the kept prefix differ in their hash.

use crate::model::Document;
use sha2::{Digest, Sha256};
use std::fmt;

const SEPARATOR: char = '_';
const SHORTENED_MARKER: char = '~';
const HASH_LEN: usize = 16;

/// Longest encoded title or id kept in a file name.
pub const MAX_PART_LEN: usize = 100;

/// Upper bound on a content file name, below the common 255-byte `NAME_MAX`.
pub const MAX_NAME_LEN: usize = 2 * MAX_PART_LEN + 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn new(title: &str, id: &str) -> Self {
        Self(format!(
            "{}{}{}",
            encode_component(title),
            SEPARATOR,
            encode_component(id)
        ))
    }

    pub fn for_document(document: &Document) -> Self {
        Self::new(&document.title, &document.id)
    }

    /// Recognize a file name produced by [`ContentKey::new`].
    pub fn from_file_name(name: &str) -> Option<Self> {
        let key = Self(name.to_string());
        key.decode().map(|_| key)
    }

    /// Split back into `(title, id)`.
    ///
    /// A shortened half decodes to its kept prefix followed by `~` and the hash.
    pub fn decode(&self) -> Option<(String, String)> {
        let (title, id) = self.0.split_once(SEPARATOR)?;
        if id.contains(SEPARATOR) || title.starts_with('.') {
            return None;
        }
        let title = urlencoding::decode(title).ok()?;
        let id = urlencoding::decode(id).ok()?;
        Some((title.into_owned(), id.into_owned()))
    }

    /// Whether either half was cut to fit the length limit.
    pub fn is_shortened(&self) -> bool {
        self.0.contains(SHORTENED_MARKER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(raw: &str) -> String {
    urlencoding::encode(raw)
        .replace('_', "%5F")
        .replace('.', "%2E")
        .replace('~', "%7E")
}

fn encode_component(raw: &str) -> String {
    let encoded = escape(raw);
    if encoded.len() <= MAX_PART_LEN {
        return encoded;
    }

    // Cut on whole characters so the kept prefix still decodes.
    let budget = MAX_PART_LEN - HASH_LEN - 1;
    let mut kept = String::new();
    let mut buf = [0u8; 4];
    for ch in raw.chars() {
        let piece = escape(ch.encode_utf8(&mut buf));
        if kept.len() + piece.len() > budget {
            break;
        }
        kept.push_str(&piece);
    }
    format!("{}{}{}", kept, SHORTENED_MARKER, short_hash(raw))
}

fn short_hash(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(HASH_LEN);
    hex
}
