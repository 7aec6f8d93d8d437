//! Band-limited resampling to the fixed analysis rate.
//!
//! Uses a windowed-sinc resampler (rubato `SincFixedIn`) fed in fixed
//! chunks, then compensates for the filter delay and trims the tail so the
//! output length is exactly `round(input_len * ratio)`.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::DecodeError;

const CHUNK_FRAMES: usize = 1024;

/// Resample mono samples from `input_rate` to `output_rate`.
///
/// Same-rate and empty inputs pass through unchanged, which keeps
/// normalization idempotent for already-canonical clips. All-zero input
/// resamples to all-zero output.
pub(crate) fn resample_band_limited(
    samples: &[f32],
    input_rate: u32,
    output_rate: u32,
) -> Result<Vec<f32>, DecodeError> {
    let input_rate = input_rate.max(1);
    let output_rate = output_rate.max(1);
    if samples.is_empty() || input_rate == output_rate {
        return Ok(samples.to_vec());
    }

    let ratio = output_rate as f64 / input_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, 1)?;

    let delay = resampler.output_delay();
    let expected = (samples.len() as f64 * ratio).round() as usize;
    let mut out: Vec<f32> = Vec::with_capacity(expected + delay);

    let mut pos = 0usize;
    while samples.len() - pos >= CHUNK_FRAMES {
        let chunk = &samples[pos..pos + CHUNK_FRAMES];
        let produced = resampler.process(&[chunk], None)?;
        out.extend_from_slice(&produced[0]);
        pos += CHUNK_FRAMES;
    }
    if pos < samples.len() {
        let produced = resampler.process_partial(Some(&[&samples[pos..]]), None)?;
        out.extend_from_slice(&produced[0]);
    }
    // Flush the filter delay line until the compensated output is complete.
    while out.len() < delay + expected {
        let produced = resampler.process_partial::<&[f32]>(None, None)?;
        if produced[0].is_empty() {
            break;
        }
        out.extend_from_slice(&produced[0]);
    }

    out.drain(..delay.min(out.len()));
    out.truncate(expected);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: u32, seconds: f32) -> Vec<f32> {
        let count = (rate as f32 * seconds).round() as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / rate as f32;
                (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn same_rate_is_a_passthrough() {
        let input = sine(220.0, 16_000, 0.2);
        let out = resample_band_limited(&input, 16_000, 16_000).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_stays_empty() {
        let out = resample_band_limited(&[], 44_100, 16_000).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn output_length_matches_rate_ratio() {
        let input = sine(440.0, 44_100, 1.0);
        let out = resample_band_limited(&input, 44_100, 16_000).unwrap();
        let expected = (input.len() as f64 * 16_000.0 / 44_100.0).round() as usize;
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn silence_resamples_to_silence() {
        let input = vec![0.0_f32; 48_000];
        let out = resample_band_limited(&input, 48_000, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
        assert!(out.iter().all(|v| v.abs() < 1e-9));
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn tone_amplitude_survives_resampling() {
        let input = sine(440.0, 48_000, 1.0);
        let out = resample_band_limited(&input, 48_000, 16_000).unwrap();
        // Compare RMS away from the edges where the filter ramps in/out.
        let mid = &out[2_000..out.len() - 2_000];
        let rms: f32 = (mid.iter().map(|v| (v * v) as f64).sum::<f64>() / mid.len() as f64).sqrt()
            as f32;
        let expected = 0.5 / std::f32::consts::SQRT_2;
        assert!((rms - expected).abs() < 0.02, "rms {rms} vs {expected}");
    }

    #[test]
    fn short_input_still_produces_proportional_output() {
        let input = sine(200.0, 44_100, 0.01);
        let out = resample_band_limited(&input, 44_100, 16_000).unwrap();
        let expected = (input.len() as f64 * 16_000.0 / 44_100.0).round() as usize;
        assert_eq!(out.len(), expected);
    }
}
