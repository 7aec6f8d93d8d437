//! Signal normalization and acoustic descriptor extraction.
//!
//! Everything downstream of decoding operates on a [`CanonicalSignal`]:
//! mono, `f32`, at a fixed 16 kHz analysis rate. The constants here are
//! domain parameters tuned for human speech and are not user-configurable.

pub mod decode;
pub mod descriptors;
mod downmix;
mod pitch;
mod resample;

use std::path::Path;

pub use decode::DecodeError;

/// Fixed sample rate every clip is normalized to before analysis.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Lower bound of the fundamental-frequency search range (Hz).
pub(crate) const PITCH_MIN_HZ: f32 = 50.0;
/// Upper bound of the fundamental-frequency search range (Hz).
pub(crate) const PITCH_MAX_HZ: f32 = 300.0;
/// Absolute YIN voicing threshold on the normalized difference function.
pub(crate) const YIN_THRESHOLD: f64 = 0.1;
/// Analysis frame length in samples for pitch and energy (128 ms at 16 kHz).
pub(crate) const FRAME_SIZE: usize = 2048;
/// Hop between analysis frames in samples.
pub(crate) const HOP_SIZE: usize = 512;

/// Mono fixed-rate audio ready for descriptor extraction.
///
/// Invariants after [`normalize_clip`]: `sample_rate == TARGET_SAMPLE_RATE`
/// and exactly one channel. Zero-length signals are valid.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSignal {
    /// Amplitude samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl CanonicalSignal {
    /// Duration of the signal in seconds; 0.0 for empty signals.
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode a clip from disk and normalize it to mono 16 kHz float samples.
///
/// Decoding failures are fatal to descriptor computation and surface as
/// [`DecodeError`]; callers decide whether the request as a whole survives.
pub fn normalize_clip(path: &Path) -> Result<CanonicalSignal, DecodeError> {
    normalize_clip_with_limit(path, None)
}

/// Like [`normalize_clip`] but bounds how many seconds are decoded.
pub fn normalize_clip_with_limit(
    path: &Path,
    max_seconds: Option<f32>,
) -> Result<CanonicalSignal, DecodeError> {
    let decoded = decode::decode_clip(path, max_seconds)?;
    let mono = downmix::downmix_to_mono(&decoded.samples, decoded.channels);
    let samples = resample::resample_band_limited(&mono, decoded.sample_rate, TARGET_SAMPLE_RATE)?;
    Ok(CanonicalSignal {
        samples,
        sample_rate: TARGET_SAMPLE_RATE,
    })
}
