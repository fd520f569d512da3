use std::fmt;

/// Outcome of one transcription request. Exactly one variant is ever produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionResult {
    Success { text: String },
    Failure { kind: FailureKind },
}

impl TranscriptionResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(kind: FailureKind) -> Self {
        Self::Failure { kind }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind } => Some(*kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The provider could not extract any speech from the segment.
    Unintelligible,
    /// The provider was unreachable or answered with something unusable.
    ProviderUnavailable,
    /// No speech started before the listening deadline.
    Timeout,
    InvalidInput(InputProblem),
    DeviceUnavailable,
    /// The upload could not be written to the holding directory.
    StorageUnavailable,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Unintelligible => "UNINTELLIGIBLE",
            FailureKind::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            FailureKind::Timeout => "TIMEOUT",
            FailureKind::InvalidInput(_) => "INVALID_INPUT",
            FailureKind::DeviceUnavailable => "DEVICE_UNAVAILABLE",
            FailureKind::StorageUnavailable => "STORAGE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidInput(problem) => write!(f, "{}({})", self.as_str(), problem),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputProblem {
    MissingFile,
    EmptyFilename,
    EmptyFile,
    UndecodableAudio,
}

impl InputProblem {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputProblem::MissingFile => "missing_file",
            InputProblem::EmptyFilename => "empty_filename",
            InputProblem::EmptyFile => "empty_file",
            InputProblem::UndecodableAudio => "undecodable_audio",
        }
    }
}

impl fmt::Display for InputProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
