use std::fmt;

/// Progress of a single transcription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStage {
    Received,
    /// Acquiring the audio source: opening the device or storing and decoding an upload.
    Capturing,
    /// Estimating ambient noise and delimiting the speech segment.
    Calibrating,
    Transcribing,
    Completed,
    Failed,
}

impl RequestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStage::Received => "RECEIVED",
            RequestStage::Capturing => "CAPTURING",
            RequestStage::Calibrating => "CALIBRATING",
            RequestStage::Transcribing => "TRANSCRIBING",
            RequestStage::Completed => "COMPLETED",
            RequestStage::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStage::Completed | RequestStage::Failed)
    }

    pub fn can_advance_to(&self, next: RequestStage) -> bool {
        use RequestStage::*;
        match (self, next) {
            (Received, Capturing)
            | (Capturing, Calibrating)
            | (Calibrating, Transcribing)
            | (Transcribing, Completed) => true,
            (current, Failed) => !current.is_terminal(),
            _ => false,
        }
    }

    pub fn advance(self, next: RequestStage) -> Result<RequestStage, StageTransitionError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(StageTransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid request stage transition: {from} -> {to}")]
pub struct StageTransitionError {
    pub from: RequestStage,
    pub to: RequestStage,
}
