#![deny(missing_docs)]

//! Command-line front end for the voice-clip screening pipeline.
//!
//! Reads a clip from disk, runs the ingestion pipeline against the
//! configured classifier, and renders the result as text or JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use verivoice::classifier::{Classifier, CommandClassifier, Verdict};
use verivoice::pipeline::{AnalysisResult, RawAudioInput, analyze_clip_with_limit};
use verivoice::settings::Settings;
use verivoice::{app_dirs, logging};

const USAGE: &str = "Usage: verivoice <clip> [--classifier <program>] [--json]";

struct CliArgs {
    clip: PathBuf,
    classifier: Option<String>,
    json: bool,
}

fn main() -> ExitCode {
    if let Err(err) = logging::init() {
        eprintln!("File logging disabled: {err}");
    }

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(result) => {
            if args.json {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("Failed to encode result: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{}", render_text(&result));
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<AnalysisResult, String> {
    let settings = load_settings();
    let classifier = resolve_classifier(args, &settings)?;

    let bytes =
        std::fs::read(&args.clip).map_err(|err| format!("Failed to read {}: {err}", args.clip.display()))?;
    let file_name = args
        .clip
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("clip")
        .to_string();
    let input = RawAudioInput::new(file_name, bytes);

    analyze_clip_with_limit(&input, classifier.as_ref(), settings.analysis.max_clip_seconds)
        .map_err(|err| format!("Analysis failed: {err}"))
}

fn load_settings() -> Settings {
    match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Using default settings: {err}");
            Settings::default()
        }
    }
}

fn resolve_classifier(
    args: &CliArgs,
    settings: &Settings,
) -> Result<Box<dyn Classifier>, String> {
    if let Some(program) = &args.classifier {
        return Ok(Box::new(CommandClassifier::new(program.clone(), Vec::new())));
    }
    if let Some(command) = &settings.classifier.command {
        return Ok(Box::new(CommandClassifier::new(
            command.clone(),
            settings.classifier.args.clone(),
        )));
    }
    let hint = app_dirs::settings_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "the settings file".to_string());
    Err(format!(
        "No classifier configured; pass --classifier <program> or set [classifier] command in {hint}"
    ))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut clip: Option<PathBuf> = None;
    let mut classifier: Option<String> = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--classifier" => {
                let program = args
                    .next()
                    .ok_or_else(|| "--classifier requires a program".to_string())?;
                classifier = Some(program);
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown option: {other}"));
            }
            _ => {
                if clip.is_some() {
                    return Err("Only one clip may be analyzed at a time".to_string());
                }
                clip = Some(PathBuf::from(arg));
            }
        }
    }

    let clip = clip.ok_or_else(|| "Missing clip path".to_string())?;
    Ok(CliArgs {
        clip,
        classifier,
        json,
    })
}

fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    match result.verdict() {
        Some(Verdict::Deepfake) => out.push_str("Verdict: deepfake detected\n"),
        Some(Verdict::Real) => out.push_str("Verdict: real voice\n"),
        None => out.push_str("Inference failed\n"),
    }
    out.push_str(&format!("Message:  {}\n", result.message));

    let d = &result.descriptors;
    out.push_str(&format!("Duration: {:.2} s\n", d.duration_seconds));
    out.push_str(&format!("Rate:     {} Hz\n", d.sample_rate));
    out.push_str(&format!("Samples:  {}\n", d.sample_count));
    out.push_str(&format!("Pitch:    {}\n", format_metric(d.average_pitch_hz, "Hz")));
    out.push_str(&format!("Energy:   {}\n", format_metric(d.average_energy, "")));
    out
}

fn format_metric(value: f32, unit: &str) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else if unit.is_empty() {
        format!("{value:.5}")
    } else {
        format!("{value:.2} {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verivoice::analysis::descriptors::AcousticDescriptors;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_clip_and_flags() {
        let args = parse(&["clip.wav", "--classifier", "infer", "--json"]).unwrap();
        assert_eq!(args.clip, PathBuf::from("clip.wav"));
        assert_eq!(args.classifier.as_deref(), Some("infer"));
        assert!(args.json);
    }

    #[test]
    fn missing_clip_is_a_usage_error() {
        assert!(parse(&["--json"]).is_err());
    }

    #[test]
    fn classifier_flag_requires_a_value() {
        assert!(parse(&["clip.wav", "--classifier"]).is_err());
    }

    #[test]
    fn unknown_options_are_rejected() {
        assert!(parse(&["clip.wav", "--verbose"]).is_err());
    }

    #[test]
    fn failed_inference_renders_distinct_state() {
        let result = AnalysisResult {
            status: 0,
            message: "model not loaded".into(),
            descriptors: AcousticDescriptors::unavailable(),
        };
        let text = render_text(&result);
        assert!(text.starts_with("Inference failed"));
        assert!(text.contains("Pitch:    n/a"));
    }

    #[test]
    fn fake_verdict_renders_deepfake_line() {
        let result = AnalysisResult {
            status: 1,
            message: "Fake voice detected".into(),
            descriptors: AcousticDescriptors::unavailable(),
        };
        assert!(render_text(&result).starts_with("Verdict: deepfake detected"));
    }
}
