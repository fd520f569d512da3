use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::TranscriptionPipeline;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TranscriptionPipeline>,
    pub index_path: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: Arc<TranscriptionPipeline>, settings: &Settings) -> Self {
        Self {
            pipeline,
            index_path: PathBuf::from(&settings.frontend.index_path),
            max_upload_bytes: settings.storage.max_upload_bytes(),
        }
    }
}
