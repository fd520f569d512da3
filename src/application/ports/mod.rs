mod audio_decoder;
mod audio_source;
mod holding_area;
mod speech_provider;

pub use audio_decoder::AudioDecoder;
pub use audio_source::{AudioSource, CaptureDevice, CaptureError};
pub use holding_area::{HoldingArea, HoldingAreaError};
pub use speech_provider::{SpeechProvider, SpeechProviderError};
