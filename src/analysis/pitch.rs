//! YIN fundamental-frequency estimation constrained to speech pitch.
//!
//! Per-frame estimates use the cumulative mean normalized difference
//! function with an absolute voicing threshold and parabolic refinement
//! (de Cheveigne & Kawahara, 2002). Frames with no dip below the threshold
//! are treated as unvoiced and ignored by the average.

use super::{FRAME_SIZE, HOP_SIZE, PITCH_MAX_HZ, PITCH_MIN_HZ, YIN_THRESHOLD};

/// Mean pitch in Hz over all voiced frames, or NaN when undefined.
///
/// Undefined covers: signals shorter than one analysis frame, a zero sample
/// rate, and signals where no frame crosses the voicing threshold (silence,
/// noise). Never panics.
pub(crate) fn average_pitch_hz(samples: &[f32], sample_rate: u32) -> f32 {
    if sample_rate == 0 || samples.len() < FRAME_SIZE {
        return f32::NAN;
    }
    let lag_min = ((sample_rate as f32 / PITCH_MAX_HZ).floor() as usize).max(2);
    let lag_max = (sample_rate as f32 / PITCH_MIN_HZ).ceil() as usize;
    if lag_max + 1 >= FRAME_SIZE {
        return f32::NAN;
    }

    let mut sum = 0.0_f64;
    let mut voiced = 0usize;
    let mut start = 0usize;
    while start + FRAME_SIZE <= samples.len() {
        let frame = &samples[start..start + FRAME_SIZE];
        if let Some(f0) = estimate_frame(frame, sample_rate, lag_min, lag_max) {
            sum += f0 as f64;
            voiced += 1;
        }
        start += HOP_SIZE;
    }
    if voiced == 0 {
        f32::NAN
    } else {
        (sum / voiced as f64) as f32
    }
}

fn estimate_frame(frame: &[f32], sample_rate: u32, lag_min: usize, lag_max: usize) -> Option<f32> {
    let window = frame.len() - lag_max;
    if window == 0 {
        return None;
    }

    // Squared difference function d(tau) over the frame.
    let mut diff = vec![0.0_f64; lag_max + 1];
    for (lag, value) in diff.iter_mut().enumerate().skip(1) {
        let mut acc = 0.0_f64;
        for i in 0..window {
            let d = (frame[i] - frame[i + lag]) as f64;
            acc += d * d;
        }
        *value = acc;
    }

    // Cumulative mean normalized difference d'(tau).
    let mut cmnd = vec![1.0_f64; lag_max + 1];
    let mut running = 0.0_f64;
    for lag in 1..=lag_max {
        running += diff[lag];
        cmnd[lag] = if running > 0.0 {
            diff[lag] * lag as f64 / running
        } else {
            1.0
        };
    }

    // First dip below the absolute threshold within the search range,
    // descended to its local minimum.
    let mut lag = lag_min;
    while lag <= lag_max {
        if cmnd[lag] < YIN_THRESHOLD {
            while lag + 1 <= lag_max && cmnd[lag + 1] < cmnd[lag] {
                lag += 1;
            }
            let refined = refine_lag(&cmnd, lag);
            return Some(sample_rate as f32 / refined as f32);
        }
        lag += 1;
    }
    None
}

/// Parabolic interpolation around the selected lag for sub-sample accuracy.
fn refine_lag(cmnd: &[f64], lag: usize) -> f64 {
    if lag == 0 || lag + 1 >= cmnd.len() {
        return lag as f64;
    }
    let left = cmnd[lag - 1];
    let center = cmnd[lag];
    let right = cmnd[lag + 1];
    let denom = 2.0 * (left - 2.0 * center + right);
    if denom.abs() < f64::EPSILON {
        return lag as f64;
    }
    let offset = (left - right) / denom;
    lag as f64 + offset.clamp(-1.0, 1.0)
}
