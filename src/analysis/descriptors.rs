//! Acoustic descriptors summarizing a normalized clip.
//!
//! Descriptors are diagnostic, not decision-critical: every metric is
//! fault-isolated, degrading to a NaN sentinel instead of failing the
//! request, and extraction as a whole always returns a complete record.

use serde::Serialize;

use super::{CanonicalSignal, FRAME_SIZE, HOP_SIZE, pitch};

/// Fixed-shape descriptor record handed to the presentation layer.
///
/// `average_pitch_hz` and `average_energy` are NaN when the metric is
/// undefined for the input; an empty `waveform` means no signal is
/// available for display. The record is structurally complete in every
/// case, including decode failures.
#[derive(Debug, Clone, Serialize)]
pub struct AcousticDescriptors {
    /// Number of samples in the canonical signal.
    pub sample_count: usize,
    /// Sample rate of the canonical signal in Hz.
    pub sample_rate: u32,
    /// Clip duration in seconds; 0.0 for empty clips.
    pub duration_seconds: f32,
    /// Mean fundamental frequency over voiced frames, NaN when undefined.
    pub average_pitch_hz: f32,
    /// Mean short-frame RMS energy, NaN when undefined.
    pub average_energy: f32,
    /// Canonical samples passed through for visualization.
    pub waveform: Vec<f32>,
}

impl AcousticDescriptors {
    /// Fully-defaulted record used when no signal could be decoded.
    pub fn unavailable() -> Self {
        Self {
            sample_count: 0,
            sample_rate: 0,
            duration_seconds: 0.0,
            average_pitch_hz: f32::NAN,
            average_energy: f32::NAN,
            waveform: Vec::new(),
        }
    }
}

/// Compute descriptors for a canonical signal. Never fails.
pub fn extract_descriptors(signal: &CanonicalSignal) -> AcousticDescriptors {
    AcousticDescriptors {
        sample_count: signal.samples.len(),
        sample_rate: signal.sample_rate,
        duration_seconds: signal.duration_seconds(),
        average_pitch_hz: pitch::average_pitch_hz(&signal.samples, signal.sample_rate),
        average_energy: average_energy(&signal.samples),
        waveform: signal.samples.clone(),
    }
}

/// Mean RMS across short frames, NaN for empty signals.
///
/// A silent clip has a defined energy of 0.0; only the absence of samples
/// makes the metric undefined.
fn average_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return f32::NAN;
    }
    let mut sum = 0.0_f64;
    let mut frames = 0usize;
    let mut start = 0usize;
    while start < samples.len() {
        let end = (start + FRAME_SIZE).min(samples.len());
        sum += frame_rms(&samples[start..end]) as f64;
        frames += 1;
        start = start.saturating_add(HOP_SIZE);
    }
    (sum / frames as f64) as f32
}

fn frame_rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0_f64;
    for &sample in frame {
        let sample = if sample.is_finite() {
            sample.clamp(-1.0, 1.0) as f64
        } else {
            0.0
        };
        sum += sample * sample;
    }
    ((sum / frame.len() as f64).sqrt() as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TARGET_SAMPLE_RATE;

    fn canonical(samples: Vec<f32>) -> CanonicalSignal {
        CanonicalSignal {
            samples,
            sample_rate: TARGET_SAMPLE_RATE,
        }
    }

    #[test]
    fn empty_signal_yields_a_complete_record() {
        let descriptors = extract_descriptors(&canonical(Vec::new()));
        assert_eq!(descriptors.sample_count, 0);
        assert_eq!(descriptors.sample_rate, TARGET_SAMPLE_RATE);
        assert_eq!(descriptors.duration_seconds, 0.0);
        assert!(descriptors.average_pitch_hz.is_nan());
        assert!(descriptors.average_energy.is_nan());
        assert!(descriptors.waveform.is_empty());
    }

    #[test]
    fn silence_has_zero_energy_but_undefined_pitch() {
        let descriptors = extract_descriptors(&canonical(vec![0.0; TARGET_SAMPLE_RATE as usize]));
        assert!((descriptors.average_energy - 0.0).abs() < 1e-9);
        assert!(descriptors.average_pitch_hz.is_nan());
        assert!((descriptors.duration_seconds - 1.0).abs() < 1e-6);
    }

    #[test]
    fn short_clip_keeps_duration_while_pitch_degrades() {
        let count = 800usize;
        let descriptors = extract_descriptors(&canonical(vec![0.3; count]));
        assert_eq!(descriptors.sample_count, count);
        assert!((descriptors.duration_seconds - 0.05).abs() < 1e-6);
        assert!(descriptors.average_pitch_hz.is_nan());
        assert!((descriptors.average_energy - 0.3).abs() < 1e-3);
    }

    #[test]
    fn constant_signal_energy_matches_amplitude() {
        let descriptors = extract_descriptors(&canonical(vec![0.5; TARGET_SAMPLE_RATE as usize]));
        assert!((descriptors.average_energy - 0.5).abs() < 1e-3);
    }

    #[test]
    fn waveform_is_the_canonical_samples() {
        let samples = vec![0.1_f32, -0.2, 0.3];
        let descriptors = extract_descriptors(&canonical(samples.clone()));
        assert_eq!(descriptors.waveform, samples);
    }

    #[test]
    fn unavailable_record_is_all_sentinels() {
        let descriptors = AcousticDescriptors::unavailable();
        assert_eq!(descriptors.sample_count, 0);
        assert_eq!(descriptors.sample_rate, 0);
        assert_eq!(descriptors.duration_seconds, 0.0);
        assert!(descriptors.average_pitch_hz.is_nan());
        assert!(descriptors.average_energy.is_nan());
        assert!(descriptors.waveform.is_empty());
    }
}
