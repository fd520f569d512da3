use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::domain::AudioSegment;

/// 16-bit mono PCM WAV, the lowest common denominator for upload APIs.
pub fn encode_wav(segment: &AudioSegment) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: segment.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + segment.len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in segment.samples() {
            writer.write_sample(to_i16(sample))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Raw big-endian 16-bit samples (`audio/l16`).
pub fn encode_l16(segment: &AudioSegment) -> Vec<u8> {
    segment
        .samples()
        .iter()
        .flat_map(|&sample| to_i16(sample).to_be_bytes())
        .collect()
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}
