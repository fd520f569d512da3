use std::fmt;

use super::{SanitizedFilename, UploadId};

/// Key of an upload inside the holding directory: `<upload-uuid>_<sanitized name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(upload_id: &UploadId, filename: &SanitizedFilename) -> Self {
        Self(format!("{}_{}", upload_id.as_uuid(), filename.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
