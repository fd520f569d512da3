use std::io::Cursor;

use voxscribe::domain::AudioSegment;
use voxscribe::infrastructure::audio::wav_encoder::{encode_l16, encode_wav};

#[test]
fn given_segment_when_encoding_wav_then_header_describes_16_bit_mono() {
    let segment = AudioSegment::new(vec![0.0, 0.5, -0.5, 1.0], 16_000);

    let wav = encode_wav(&segment).unwrap();
    let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let spec = reader.spec();

    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len(), 4);
}

#[test]
fn given_out_of_range_samples_when_encoding_wav_then_values_are_clamped() {
    let segment = AudioSegment::new(vec![2.0, -2.0], 8_000);

    let wav = encode_wav(&segment).unwrap();
    let samples: Vec<i16> = hound::WavReader::new(Cursor::new(wav))
        .unwrap()
        .samples::<i16>()
        .map(Result::unwrap)
        .collect();

    assert_eq!(samples, vec![i16::MAX, -i16::MAX]);
}

#[test]
fn given_segment_when_encoding_l16_then_samples_are_big_endian() {
    let segment = AudioSegment::new(vec![1.0, 0.0], 16_000);

    let bytes = encode_l16(&segment);

    assert_eq!(bytes, vec![0x7f, 0xff, 0x00, 0x00]);
}
