pub mod audio_decoder;
mod google_speech_provider;
mod live_capture;
mod openai_whisper_provider;
mod speech_provider_factory;
pub mod wav_encoder;

pub use audio_decoder::SymphoniaAudioDecoder;
pub use google_speech_provider::{GOOGLE_SPEECH_URL, GoogleSpeechProvider, parse_recognize_body};
pub use live_capture::{CpalCaptureDevice, LiveCapture};
pub use openai_whisper_provider::OpenAiWhisperProvider;
pub use speech_provider_factory::SpeechProviderFactory;
