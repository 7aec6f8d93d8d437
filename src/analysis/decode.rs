//! Container decoding via symphonia.
//!
//! Produces raw interleaved `f32` samples with the native sample rate and
//! channel count; normalization to the analysis format happens afterwards.

use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use thiserror::Error;

/// Failures while turning clip bytes into samples.
///
/// Any variant means no canonical signal can be produced for the clip.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The staged file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The container/codec could not be recognized.
    #[error("Unrecognized audio container for {path}: {source}")]
    Probe {
        path: PathBuf,
        source: SymphoniaError,
    },
    /// The container parsed but exposed no usable audio track.
    #[error("No decodable audio track in {path}")]
    NoTrack { path: PathBuf },
    /// Track metadata was missing a sample rate or channel layout.
    #[error("Missing {field} for {path}")]
    MissingParams { path: PathBuf, field: &'static str },
    /// No decoder is available for the track's codec.
    #[error("Codec setup failed for {path}: {source}")]
    Codec {
        path: PathBuf,
        source: SymphoniaError,
    },
    /// Packet reading failed mid-stream.
    #[error("Packet read failed for {path}: {source}")]
    Packet {
        path: PathBuf,
        source: SymphoniaError,
    },
    /// Building the band-limited resampler failed.
    #[error("Failed to build resampler: {0}")]
    ResamplerBuild(#[from] rubato::ResamplerConstructionError),
    /// Running the band-limited resampler failed.
    #[error("Resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),
}

/// Raw decoded audio in interleaved `f32` samples.
#[derive(Debug)]
pub(crate) struct DecodedClip {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

/// Decode up to `max_seconds` of audio from `path`.
///
/// The file extension is passed to symphonia as a format hint, which is why
/// staging preserves the caller-supplied name. Zero decoded samples is a
/// valid outcome (empty clip), not an error.
pub(crate) fn decode_clip(
    path: &Path,
    max_seconds: Option<f32>,
) -> Result<DecodedClip, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| DecodeError::Probe {
            path: path.to_path_buf(),
            source,
        })?;
    let mut format = probed.format;
    let track = format.default_track().ok_or_else(|| DecodeError::NoTrack {
        path: path.to_path_buf(),
    })?;
    let codec_params = &track.codec_params;
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::MissingParams {
            path: path.to_path_buf(),
            field: "sample rate",
        })?
        .max(1);
    let channels = codec_params
        .channels
        .ok_or_else(|| DecodeError::MissingParams {
            path: path.to_path_buf(),
            field: "channel layout",
        })?
        .count()
        .max(1) as u16;
    let max_samples = max_seconds.filter(|limit| *limit > 0.0).map(|limit| {
        let frames = (limit * sample_rate as f32).ceil().max(1.0);
        (frames as usize).saturating_mul(channels as usize)
    });

    let mut decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|source| DecodeError::Codec {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();
    loop {
        if max_samples.is_some_and(|limit| samples.len() >= limit) {
            break;
        }
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an IO error from the reader.
            Err(SymphoniaError::IoError(_)) => break,
            Err(source) => {
                return Err(DecodeError::Packet {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            // Skip corrupt packets; later packets may still decode.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(source) => {
                return Err(DecodeError::Packet {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }
    if let Some(limit) = max_samples {
        samples.truncate(limit);
    }

    Ok(DecodedClip {
        samples,
        sample_rate,
        channels,
    })
}
