use super::doc_store::DocStore;
use super::fs_backend::FsBackend;
use crate::config::DocketConfig;
use crate::error::Result;
use std::path::Path;

pub type FileStore = DocStore<FsBackend>;

impl FileStore {
    /// Store rooted at `root` with the default layout and policy.
    pub fn new(root: impl AsRef<Path>) -> Self {
        DocStore::with_backend(FsBackend::new(root))
    }

    /// Store rooted at `root`, configured from `<root>/docket.toml` and the environment.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let config = DocketConfig::load(root)?;
        Ok(Self::with_config(root, &config))
    }

    pub fn with_config(root: impl AsRef<Path>, config: &DocketConfig) -> Self {
        DocStore::with_backend(FsBackend::from_config(root, config))
            .with_policy(config.conflict_policy())
    }
}
