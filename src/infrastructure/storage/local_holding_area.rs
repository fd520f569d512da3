use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{HoldingArea, HoldingAreaError};
use crate::domain::StoragePath;

/// Holding directory on the local filesystem. Every key is resolved under
/// the directory prefix, so nothing can be written outside it.
pub struct LocalHoldingArea {
    inner: Arc<LocalFileSystem>,
    root: PathBuf,
}

impl LocalHoldingArea {
    /// Creates the directory if it is missing.
    pub fn new(base_path: PathBuf) -> Result<Self, HoldingAreaError> {
        std::fs::create_dir_all(&base_path)?;
        let root = std::fs::canonicalize(&base_path)?;
        let fs = LocalFileSystem::new_with_prefix(&root)
            .map_err(|e| HoldingAreaError::WriteFailed(e.to_string()))?;

        tracing::info!(path = %root.display(), "Upload holding directory ready");

        Ok(Self {
            inner: Arc::new(fs),
            root,
        })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait::async_trait]
impl HoldingArea for LocalHoldingArea {
    async fn persist(&self, path: &StoragePath, data: Bytes) -> Result<u64, HoldingAreaError> {
        let store_path = StorePath::from(path.as_str());
        let size = data.len() as u64;

        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| HoldingAreaError::WriteFailed(e.to_string()))?;

        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, HoldingAreaError> {
        let store_path = StorePath::from(path.as_str());
        let result = self.inner.get(&store_path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => HoldingAreaError::NotFound(path.to_string()),
            other => HoldingAreaError::ReadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| HoldingAreaError::ReadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn remove(&self, path: &StoragePath) -> Result<(), HoldingAreaError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| HoldingAreaError::DeleteFailed(e.to_string()))
    }

    fn resolve(&self, path: &StoragePath) -> PathBuf {
        self.root.join(path.as_str())
    }
}
