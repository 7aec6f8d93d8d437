//! Voice-clip screening pipeline: normalize uploaded audio, extract
//! acoustic descriptors defensively, and obtain a real/deepfake verdict
//! from an external classifier.

/// Signal normalization and descriptor extraction.
pub mod analysis;
/// Application directory resolution.
pub mod app_dirs;
/// External classifier seam and verdict parsing.
pub mod classifier;
/// Logging setup.
pub mod logging;
/// Request orchestration with scoped staging.
pub mod pipeline;
/// Persisted user settings.
pub mod settings;
