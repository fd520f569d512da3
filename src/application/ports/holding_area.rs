use std::io;
use std::path::PathBuf;

use bytes::Bytes;

use crate::domain::StoragePath;

/// Directory where uploads wait while they are being transcribed.
#[async_trait::async_trait]
pub trait HoldingArea: Send + Sync {
    async fn persist(&self, path: &StoragePath, data: Bytes) -> Result<u64, HoldingAreaError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, HoldingAreaError>;

    async fn remove(&self, path: &StoragePath) -> Result<(), HoldingAreaError>;

    /// Filesystem location of `path`; always inside the holding directory.
    fn resolve(&self, path: &StoragePath) -> PathBuf;
}

#[derive(Debug, thiserror::Error)]
pub enum HoldingAreaError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
