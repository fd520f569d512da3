use std::io::Cursor;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoder, CaptureError};
use crate::domain::AudioSegment;

pub const TARGET_SAMPLE_RATE: u32 = 16_000;

const RESAMPLE_CHUNK: usize = 1024;

/// Decodes any container symphonia can probe into 16 kHz mono.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaAudioDecoder;

impl AudioDecoder for SymphoniaAudioDecoder {
    fn decode(&self, data: &[u8]) -> Result<AudioSegment, CaptureError> {
        if data.is_empty() {
            return Err(CaptureError::EmptyInput);
        }

        let mut track = TrackReader::open(data.to_vec())?;
        let mono = track.read_mono()?;
        if mono.is_empty() {
            return Err(CaptureError::EmptyInput);
        }

        let samples = if track.sample_rate == TARGET_SAMPLE_RATE {
            mono
        } else {
            resample(&mono, track.sample_rate, TARGET_SAMPLE_RATE)?
        };
        let segment = AudioSegment::new(samples, TARGET_SAMPLE_RATE);

        tracing::debug!(
            source_rate = track.sample_rate,
            channels = track.channels,
            samples = segment.len(),
            duration_secs = segment.duration().as_secs_f32(),
            "Upload decoded to 16kHz mono PCM"
        );

        Ok(segment)
    }
}

/// The default track of a probed container with its codec ready.
struct TrackReader {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
}

impl TrackReader {
    fn open(bytes: Vec<u8>) -> Result<Self, CaptureError> {
        let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
        let format = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| undecodable("unrecognized container", e))?
            .format;

        let track = format
            .default_track()
            .ok_or_else(|| CaptureError::Undecodable("container has no audio track".to_string()))?;
        let params = &track.codec_params;
        let sample_rate = params
            .sample_rate
            .ok_or_else(|| CaptureError::Undecodable("track has no sample rate".to_string()))?;
        let channels = params.channels.map_or(1, |c| c.count()).max(1);
        let track_id = track.id;

        let decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(|e| undecodable("unsupported codec", e))?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
        })
    }

    /// Every packet of the track, averaged across channels.
    fn read_mono(&mut self) -> Result<Vec<f32>, CaptureError> {
        let mut mono = Vec::new();
        let mut buffer: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(undecodable("unreadable packet", e)),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(reason)) => {
                    tracing::warn!(reason, "Skipping corrupt audio frame");
                    continue;
                }
                Err(e) => return Err(undecodable("decode failed", e)),
            };
            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let frames = decoded.capacity();
            let channels = spec.channels.count().max(1);
            if buffer
                .as_ref()
                .is_none_or(|buf| buf.capacity() < frames * channels)
            {
                buffer = Some(SampleBuffer::new(frames as u64, spec));
            }
            let Some(buf) = buffer.as_mut() else {
                continue;
            };
            buf.copy_interleaved_ref(decoded);
            downmix_into(&mut mono, buf.samples(), channels);
        }

        Ok(mono)
    }
}

fn downmix_into(mono: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels == 1 {
        mono.extend_from_slice(interleaved);
        return;
    }
    let scale = 1.0 / channels as f32;
    mono.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale),
    );
}

/// Band-limited rate conversion that keeps the output aligned with the input:
/// the filter delay is dropped from the front and the tail is flushed out.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, CaptureError> {
    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLE_CHUNK, 1)
        .map_err(|e| undecodable("resampler setup", e))?;

    let delay = resampler.output_delay();
    let wanted = (samples.len() as f64 * ratio).round() as usize;
    let mut output = Vec::with_capacity(delay + wanted + RESAMPLE_CHUNK);

    let mut chunks = samples.chunks_exact(RESAMPLE_CHUNK);
    for chunk in &mut chunks {
        let frames = resampler
            .process(&[chunk], None)
            .map_err(|e| undecodable("resample", e))?;
        output.extend_from_slice(&frames[0]);
    }
    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let frames = resampler
            .process_partial(Some(&[remainder]), None)
            .map_err(|e| undecodable("resample", e))?;
        output.extend_from_slice(&frames[0]);
    }

    while output.len() < delay + wanted {
        let frames = resampler
            .process_partial::<Vec<f32>>(None, None)
            .map_err(|e| undecodable("resample flush", e))?;
        if frames[0].is_empty() {
            break;
        }
        output.extend_from_slice(&frames[0]);
    }

    Ok(output.into_iter().skip(delay).take(wanted).collect())
}

fn undecodable(context: &str, error: impl std::fmt::Display) -> CaptureError {
    CaptureError::Undecodable(format!("{}: {}", context, error))
}
