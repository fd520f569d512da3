use std::path::PathBuf;

use uuid::Uuid;

use super::StoragePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

/// An audio file accepted from a client and written to the holding directory.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub id: UploadId,
    pub original_name: String,
    pub storage_path: StoragePath,
    pub stored_path: PathBuf,
    pub size_bytes: u64,
}
