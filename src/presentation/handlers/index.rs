use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::presentation::state::AppState;

use super::transcription_response::error_response;

pub async fn index_handler(State(state): State<AppState>) -> Response {
    match tokio::fs::read_to_string(&state.index_path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, path = %state.index_path.display(), "Frontend page unavailable");
            error_response(StatusCode::NOT_FOUND, "Frontend page not found")
        }
    }
}
