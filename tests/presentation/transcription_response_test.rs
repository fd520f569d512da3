use axum::http::StatusCode;

use voxscribe::domain::{FailureKind, InputProblem};
use voxscribe::presentation::handlers::{failure_message, failure_status};

#[test]
fn given_unintelligible_when_mapping_then_returns_400_with_fixed_message() {
    assert_eq!(
        failure_status(FailureKind::Unintelligible),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        failure_message(FailureKind::Unintelligible, "Google API"),
        "Could not understand the audio"
    );
}

#[test]
fn given_provider_unavailable_when_mapping_then_names_provider() {
    assert_eq!(
        failure_status(FailureKind::ProviderUnavailable),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        failure_message(FailureKind::ProviderUnavailable, "Google API"),
        "Error connecting to Google API"
    );
}

#[test]
fn given_input_problems_when_mapping_then_each_has_its_own_message() {
    let cases = [
        (InputProblem::MissingFile, "No file provided"),
        (InputProblem::EmptyFilename, "No selected file"),
        (InputProblem::EmptyFile, "Uploaded file is empty"),
        (
            InputProblem::UndecodableAudio,
            "Uploaded file is not a readable audio file",
        ),
    ];

    for (problem, message) in cases {
        let kind = FailureKind::InvalidInput(problem);
        assert_eq!(failure_status(kind), StatusCode::BAD_REQUEST);
        assert_eq!(failure_message(kind, "Google API"), message);
    }
}

#[test]
fn given_capture_failures_when_mapping_then_uses_timeout_and_unavailable_statuses() {
    assert_eq!(
        failure_status(FailureKind::Timeout),
        StatusCode::REQUEST_TIMEOUT
    );
    assert_eq!(
        failure_status(FailureKind::DeviceUnavailable),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        failure_status(FailureKind::StorageUnavailable),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
