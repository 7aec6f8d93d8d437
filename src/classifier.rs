//! The external classifier seam.
//!
//! The pipeline treats classification as an opaque collaborator returning a
//! `(status, message)` pair: status 1 means a verdict was produced and the
//! message describes it, anything else is a reported failure. Verdicts are
//! parsed from the message by a case-insensitive "fake" substring check for
//! compatibility with the existing collaborator; [`Verdict`] is the
//! structured surface callers should rely on.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use tracing::warn;

/// Status value meaning the classifier produced a verdict.
pub const STATUS_OK: i32 = 1;
/// Status value reported when the classifier could not run or failed.
pub const STATUS_FAILED: i32 = 0;

/// Binary real/deepfake decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// The clip was judged genuine speech.
    Real,
    /// The clip was judged synthetic.
    Deepfake,
}

/// Raw classifier output: `(status, message)` per the collaborator contract.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierReport {
    /// 1 when a verdict was produced; any other value is a failure.
    pub status: i32,
    /// Human-readable verdict or diagnostic text.
    pub message: String,
}

impl ClassifierReport {
    /// Report a successful classification with the given message.
    pub fn verdict_message(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            message: message.into(),
        }
    }

    /// Report a failed classification with a diagnostic message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILED,
            message: message.into(),
        }
    }

    /// Parse the verdict, or `None` when classification failed.
    pub fn verdict(&self) -> Option<Verdict> {
        if self.status != STATUS_OK {
            return None;
        }
        if self.message.to_lowercase().contains("fake") {
            Some(Verdict::Deepfake)
        } else {
            Some(Verdict::Real)
        }
    }
}

/// A deepfake classifier invoked with the staged clip path.
///
/// Implementations absorb their own failures into the report (status != 1
/// plus a diagnostic message) rather than panicking or returning errors;
/// the orchestrator never retries.
pub trait Classifier {
    /// Classify the clip staged at `clip_path`.
    fn classify(&self, clip_path: &Path) -> ClassifierReport;
}

/// Classifier adapter that shells out to an external inference program.
///
/// The staged clip path is appended as the final argument. Exit success
/// maps to status 1 with trimmed stdout as the message; spawn failures and
/// non-zero exits map to status 0 with a diagnostic.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
}

impl CommandClassifier {
    /// Build a classifier that runs `program` with `args` plus the clip path.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Classifier for CommandClassifier {
    fn classify(&self, clip_path: &Path) -> ClassifierReport {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(clip_path)
            .output();
        let output = match output {
            Ok(output) => output,
            Err(err) => {
                warn!("Classifier command '{}' failed to spawn: {err}", self.program);
                return ClassifierReport::failure(format!(
                    "Could not run classifier '{}': {err}",
                    self.program
                ));
            }
        };
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() {
            ClassifierReport::verdict_message(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() { stdout } else { stderr };
            ClassifierReport::failure(format!(
                "Classifier '{}' exited with {}: {detail}",
                self.program, output.status
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_substring_means_deepfake() {
        let report = ClassifierReport::verdict_message("Fake voice detected");
        assert_eq!(report.verdict(), Some(Verdict::Deepfake));
    }

    #[test]
    fn substring_check_is_case_insensitive() {
        let report = ClassifierReport::verdict_message("DEEPFAKE detected");
        assert_eq!(report.verdict(), Some(Verdict::Deepfake));
    }

    #[test]
    fn other_messages_mean_real() {
        let report = ClassifierReport::verdict_message("Real voice detected");
        assert_eq!(report.verdict(), Some(Verdict::Real));
    }

    #[test]
    fn failed_status_has_no_verdict() {
        let report = ClassifierReport::failure("model not loaded");
        assert_eq!(report.verdict(), None);
    }

    #[cfg(unix)]
    #[test]
    fn command_success_maps_to_verdict_message() {
        let classifier = CommandClassifier::new("echo", vec!["Real voice detected".into()]);
        let report = classifier.classify(Path::new("/tmp/clip.wav"));
        assert_eq!(report.status, STATUS_OK);
        assert!(report.message.starts_with("Real voice detected"));
        assert_eq!(report.verdict(), Some(Verdict::Real));
    }

    #[cfg(unix)]
    #[test]
    fn missing_program_maps_to_failure() {
        let classifier = CommandClassifier::new("verivoice-no-such-binary", Vec::new());
        let report = classifier.classify(Path::new("/tmp/clip.wav"));
        assert_eq!(report.status, STATUS_FAILED);
        assert_eq!(report.verdict(), None);
        assert!(report.message.contains("verivoice-no-such-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_maps_to_failure() {
        let classifier = CommandClassifier::new("false", Vec::new());
        let report = classifier.classify(Path::new("/tmp/clip.wav"));
        assert_eq!(report.status, STATUS_FAILED);
    }
}
