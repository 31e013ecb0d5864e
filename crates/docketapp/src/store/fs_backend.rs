use super::backend::StorageBackend;
use super::content_key::ContentKey;
use crate::config::DocketConfig;
use crate::error::{DocketError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

pub struct FsBackend {
    metadata_path: PathBuf,
    content_dir: PathBuf,
}

impl FsBackend {
    /// Backend rooted at `root` with the default file layout.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::from_config(root, &DocketConfig::default())
    }

    pub fn from_config(root: impl AsRef<Path>, config: &DocketConfig) -> Self {
        let root = root.as_ref();
        Self {
            metadata_path: config.metadata_path(root),
            content_dir: config.content_dir(root),
        }
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(DocketError::Io)?;
        }
        Ok(())
    }

    /// Write through a sibling temp file and rename over the target.
    fn write_atomic(&self, target: &Path, content: &str) -> Result<()> {
        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        let tmp = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(DocketError::Io)?;
        if let Err(e) = fs::rename(&tmp, target) {
            let _ = fs::remove_file(&tmp);
            return Err(DocketError::Io(e));
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_index(&self) -> Result<Option<String>> {
        if !self.metadata_path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.metadata_path).map_err(DocketError::Io)?;
        Ok(Some(raw))
    }

    fn write_index(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.metadata_path.parent() {
            self.ensure_dir(parent)?;
        }
        self.write_atomic(&self.metadata_path, raw)
    }

    fn ensure_content_dir(&self) -> Result<()> {
        if self.content_dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.content_dir).map_err(|source| DocketError::StorageUnavailable {
            path: self.content_dir.clone(),
            source,
        })
    }

    fn content_exists(&self, key: &ContentKey) -> bool {
        self.content_path(key).is_file()
    }

    fn read_content(&self, key: &ContentKey) -> Result<Option<String>> {
        let path = self.content_path(key);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(DocketError::Io)?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %key, "content file is not valid UTF-8, reading lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Some(content))
    }

    fn write_content(&self, key: &ContentKey, content: &str) -> Result<()> {
        self.ensure_content_dir()?;
        self.write_atomic(&self.content_path(key), content)
    }

    fn delete_content(&self, key: &ContentKey) -> Result<()> {
        let path = self.content_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(DocketError::Io)?;
        }
        Ok(())
    }

    fn list_content_keys(&self) -> Result<Vec<ContentKey>> {
        if !self.content_dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.content_dir).map_err(DocketError::Io)? {
            let path = entry.map_err(DocketError::Io)?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(key) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(ContentKey::from_file_name)
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn content_path(&self, key: &ContentKey) -> PathBuf {
        self.content_dir.join(key.as_str())
    }
}
