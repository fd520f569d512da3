use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{FailureKind, InputProblem, TranscriptionResult};

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub text: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn failure_status(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Unintelligible | FailureKind::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FailureKind::ProviderUnavailable | FailureKind::StorageUnavailable => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        FailureKind::Timeout => StatusCode::REQUEST_TIMEOUT,
        FailureKind::DeviceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn failure_message(kind: FailureKind, provider_name: &str) -> String {
    match kind {
        FailureKind::Unintelligible => "Could not understand the audio".to_string(),
        FailureKind::ProviderUnavailable => format!("Error connecting to {}", provider_name),
        FailureKind::Timeout => "No speech detected before the listening timeout".to_string(),
        FailureKind::DeviceUnavailable => "No audio input device available".to_string(),
        FailureKind::StorageUnavailable => "Failed to store the uploaded file".to_string(),
        FailureKind::InvalidInput(problem) => match problem {
            InputProblem::MissingFile => "No file provided",
            InputProblem::EmptyFilename => "No selected file",
            InputProblem::EmptyFile => "Uploaded file is empty",
            InputProblem::UndecodableAudio => "Uploaded file is not a readable audio file",
        }
        .to_string(),
    }
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// `200 {"text"}` on success, otherwise the failure's status and `{"error"}`.
pub fn transcription_response(result: TranscriptionResult, provider_name: &str) -> Response {
    match result {
        TranscriptionResult::Success { text } => {
            (StatusCode::OK, Json(TranscriptResponse { text })).into_response()
        }
        TranscriptionResult::Failure { kind } => {
            error_response(failure_status(kind), failure_message(kind, provider_name))
        }
    }
}
