use axum::extract::State;
use axum::response::Response;

use crate::presentation::state::AppState;

use super::transcription_response::transcription_response;

#[tracing::instrument(skip(state))]
pub async fn record_handler(State(state): State<AppState>) -> Response {
    let result = state.pipeline.handle_live_record().await;
    transcription_response(result, state.pipeline.provider_name())
}
