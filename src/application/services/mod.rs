mod file_capture;
mod noise_calibrator;
mod transcription_client;
mod transcription_pipeline;

pub use file_capture::FileCapture;
pub use noise_calibrator::{
    CalibrationSettings, DEFAULT_CHUNK_SIZE, DEFAULT_ENERGY_THRESHOLD, NoiseCalibrator,
};
pub use transcription_client::TranscriptionClient;
pub use transcription_pipeline::{AudioUpload, PipelineSettings, TranscriptionPipeline};
