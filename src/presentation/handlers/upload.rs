use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::response::Response;

use crate::application::services::AudioUpload;
use crate::presentation::state::AppState;

use super::transcription_response::{error_response, transcription_response};

pub const FILE_FIELD: &str = "file";

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(mut multipart) => match read_file_field(&mut multipart).await {
            Ok(upload) => upload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart upload");
                return error_response(e.status(), format!("Failed to read upload: {}", e.body_text()));
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Upload request is not multipart");
            None
        }
    };

    let result = state.pipeline.handle_upload(upload).await;
    transcription_response(result, state.pipeline.provider_name())
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<AudioUpload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A part without a filename attribute is a plain form value, not a file.
        let Some(original_name) = field.file_name().map(str::to_string) else {
            tracing::debug!("Ignoring file part without a filename");
            continue;
        };
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let data = field.bytes().await?;

        tracing::debug!(
            filename = %original_name,
            content_type = %content_type,
            bytes = data.len(),
            "File field received"
        );

        return Ok(Some(AudioUpload {
            original_name: Some(original_name),
            data,
        }));
    }

    Ok(None)
}
