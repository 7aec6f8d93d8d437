//! Ingestion orchestration: staging, normalization, descriptors, verdict.
//!
//! One call to [`analyze_clip`] is one isolated request: the raw bytes are
//! staged into a fresh uniquely-named temp directory, normalized and
//! described, handed to the classifier, and the staging directory is
//! released on every exit path. Requests share no mutable state, so
//! concurrent callers only need their own inputs.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::descriptors::{AcousticDescriptors, extract_descriptors};
use crate::analysis::normalize_clip_with_limit;
use crate::classifier::{Classifier, Verdict};

/// One clip submitted for analysis: raw container bytes plus the display
/// name whose extension drives codec detection. Consumed by exactly one
/// request and never persisted beyond it.
#[derive(Debug, Clone)]
pub struct RawAudioInput {
    /// Caller-supplied file name, e.g. `recording.wav`.
    pub file_name: String,
    /// Undecoded container bytes.
    pub bytes: Vec<u8>,
}

impl RawAudioInput {
    /// Wrap raw bytes with their display name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Terminal artifact of one analysis request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Classifier status; 1 means a verdict was produced.
    pub status: i32,
    /// Classifier message (verdict text or diagnostic).
    pub message: String,
    /// Acoustic descriptors, defaulted when the clip was undecodable.
    pub descriptors: AcousticDescriptors,
}

impl AnalysisResult {
    /// Parsed verdict, or `None` when classification failed.
    pub fn verdict(&self) -> Option<Verdict> {
        crate::classifier::ClassifierReport {
            status: self.status,
            message: self.message.clone(),
        }
        .verdict()
    }
}

/// Storage failures that abort a request.
///
/// Decode and classifier failures are absorbed into the result; only
/// transient-storage problems propagate.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Creating the request-scoped staging directory failed.
    #[error("Failed to create staging directory: {0}")]
    CreateStaging(#[source] std::io::Error),
    /// Writing the clip bytes under the staging directory failed.
    #[error("Failed to stage clip at {path}: {source}")]
    StageClip {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Run the full ingestion pipeline for one clip.
///
/// Descriptor extraction failures never block classification: undecodable
/// input substitutes [`AcousticDescriptors::unavailable`] and the staged
/// file still goes to the classifier, which may handle codecs the decoder
/// rejects. Staging is released unconditionally; a release failure is
/// logged and never masks the result.
pub fn analyze_clip(
    input: &RawAudioInput,
    classifier: &dyn Classifier,
) -> Result<AnalysisResult, PipelineError> {
    analyze_clip_with_limit(input, classifier, None)
}

/// [`analyze_clip`] with an optional cap on decoded seconds.
pub fn analyze_clip_with_limit(
    input: &RawAudioInput,
    classifier: &dyn Classifier,
    max_clip_seconds: Option<f32>,
) -> Result<AnalysisResult, PipelineError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, clip = %input.file_name, bytes = input.bytes.len(), "Analyzing clip");

    // TempDir guarantees best-effort removal on drop, covering the early
    // return below and any panic in between; the explicit close at the end
    // lets release failures be observed and logged.
    let staging = TempDir::new().map_err(PipelineError::CreateStaging)?;
    let staged_path = staging.path().join(sanitize_file_name(&input.file_name));
    if let Err(source) = std::fs::write(&staged_path, &input.bytes) {
        return Err(PipelineError::StageClip {
            path: staged_path,
            source,
        });
    }
    debug!(%request_id, path = %staged_path.display(), "Clip staged");

    let descriptors = match normalize_clip_with_limit(&staged_path, max_clip_seconds) {
        Ok(signal) => extract_descriptors(&signal),
        Err(err) => {
            warn!(%request_id, "Descriptor extraction failed, proceeding to classification: {err}");
            AcousticDescriptors::unavailable()
        }
    };

    let report = classifier.classify(&staged_path);
    info!(%request_id, status = report.status, "Classifier reported");

    if let Err(err) = staging.close() {
        warn!(%request_id, "Failed to release staging directory: {err}");
    }

    Ok(AnalysisResult {
        status: report.status,
        message: report.message,
        descriptors,
    })
}

/// Reduce a caller-supplied display name to a safe single file name.
///
/// Strips any path components while keeping the extension the decoder uses
/// as a codec hint. Empty or path-only names fall back to `clip`.
fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("")
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        "clip".to_string()
    } else {
        name.to_string()
    }
}
