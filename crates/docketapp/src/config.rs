//! # Configuration
//!
//! Docket configuration is declared with [`confique`] and resolved in priority order:
//!
//! 1. **Environment variables**: `DOCKET_METADATA_FILE`, `DOCKET_CONTENT_DIR`.
//! 2. **Store config**: `<root>/docket.toml`.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `metadata_file` | `documents.json` | Metadata file, relative to the store root |
//! | `content_dir` | `storage` | Directory of content files, relative to the store root |
//! | `on_conflict` | `reassign` | What `save` does with an id that already exists |

use crate::error::{DocketError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "docket.toml";

/// What `save` does when the incoming document's id is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Persist as a new record under a freshly generated id.
    #[default]
    Reassign,
    /// Overwrite the existing record in place, keeping its `created`.
    Replace,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocketConfig {
    #[config(default = "documents.json", env = "DOCKET_METADATA_FILE")]
    pub metadata_file: String,

    #[config(default = "storage", env = "DOCKET_CONTENT_DIR")]
    pub content_dir: String,

    /// When absent, defaults to `reassign`.
    pub on_conflict: Option<ConflictPolicy>,
}

impl Default for DocketConfig {
    fn default() -> Self {
        Self {
            metadata_file: "documents.json".to_string(),
            content_dir: "storage".to_string(),
            on_conflict: None,
        }
    }
}

impl DocketConfig {
    /// Load the config for a store rooted at `root`. A missing file yields defaults.
    pub fn load(root: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(root.join(CONFIG_FILENAME))
            .load()
            .map_err(|e| DocketError::Config(e.to_string()))
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.on_conflict.unwrap_or_default()
    }

    pub fn metadata_path(&self, root: &Path) -> PathBuf {
        root.join(&self.metadata_file)
    }

    pub fn content_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.content_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DocketConfig::default();
        assert_eq!(config.metadata_file, "documents.json");
        assert_eq!(config.content_dir, "storage");
        assert_eq!(config.conflict_policy(), ConflictPolicy::Reassign);
    }

    #[test]
    fn test_paths_are_relative_to_root() {
        let config = DocketConfig::default();
        let root = Path::new("/data/docket");
        assert_eq!(
            config.metadata_path(root),
            PathBuf::from("/data/docket/documents.json")
        );
        assert_eq!(config.content_dir(root), PathBuf::from("/data/docket/storage"));
    }

    #[test]
    fn test_conflict_policy_from_toml() {
        let config: DocketConfig = toml::from_str(
            r#"
            metadata_file = "meta.json"
            content_dir = "bodies"
            on_conflict = "replace"
            "#,
        )
        .unwrap();
        assert_eq!(config.conflict_policy(), ConflictPolicy::Replace);
        assert_eq!(config.metadata_file, "meta.json");
    }
}
