use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use super::ObjectStore;

/// Filesystem-backed store; uploaded files are served back under
/// `{public_base_url}/uploads/`.
#[derive(Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String> {
        let target = self.root.join(path);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(format!("{}/uploads/{}", self.public_base_url, path))
    }
}
