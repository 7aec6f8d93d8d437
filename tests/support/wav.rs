use std::io::Cursor;

/// Encode mono or multi-channel float frames as an in-memory WAV file.
pub fn wav_bytes(channels: u16, sample_rate: u32, frames: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("create wav writer");
        for &frame in frames {
            for _ in 0..channels {
                writer.write_sample(frame).expect("write wav sample");
            }
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// A sine tone of the given frequency, one value per frame.
pub fn sine_frames(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
    let count = (sample_rate as f32 * seconds).round() as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
        })
        .collect()
}
