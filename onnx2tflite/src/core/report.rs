//! Human-readable console report for a conversion pass.
//!
//! Rendering is pure so the wording can be tested without running anything;
//! `main` decides where the text goes.

use std::fmt::Write as _;
use std::path::Path;

use crate::core::types::{ConversionOutcome, ToolRun};

/// Packages the default converter needs in its Python environment.
pub const REQUIRED_PACKAGES: &str = "onnx2tf tensorflow onnx sng4onnx ai_edge_litert";

const RULE: &str = "----------------------------";

/// Banner printed before the converter starts.
pub fn render_start(tool: &str, input: &Path) -> String {
    format!(
        "--- Starting conversion with {tool} ---\nInput file: {}\nConverting (this can take a moment)...\n",
        input.display()
    )
}

/// Render the final report for `outcome`. `tool` names the converter in
/// stream headers.
pub fn render_outcome(tool: &str, outcome: &ConversionOutcome) -> String {
    match outcome {
        ConversionOutcome::Converted { destination, .. } => format!(
            "\n--- SUCCESS ---\n\nYour file is ready in the project folder.\nFile name: {}\n\n{RULE}\n",
            destination.display()
        ),
        ConversionOutcome::MissingInput { input } => format!(
            "--- Attention ---\n\nError: input file '{0}' not found!\nInfo: put '{0}' into the project folder.\n\n{RULE}\n",
            input.display()
        ),
        ConversionOutcome::ToolFailed(run) => render_tool_failure(tool, run),
        ConversionOutcome::NoArtifact {
            work_dir,
            extension,
        } => format!(
            "Error: conversion finished, but no .{extension} file was found in '{}'.\n",
            work_dir.display()
        ),
    }
}

fn render_tool_failure(tool: &str, run: &ToolRun) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nError running {tool}. {}", describe_exit(run));
    out.push('\n');
    let _ = writeln!(out, "--- {tool} STDOUT ---");
    out.push_str(&run.stdout);
    push_truncation(&mut out, "stdout", run.stdout_truncated);
    ensure_newline(&mut out);
    let _ = writeln!(out, "--- {tool} STDERR ---");
    out.push_str(&run.stderr);
    push_truncation(&mut out, "stderr", run.stderr_truncated);
    ensure_newline(&mut out);
    let _ = writeln!(out, "Hint: did you run 'pip install {REQUIRED_PACKAGES}'?");
    out.push_str("Hint: every package listed there must be installed for the converter's interpreter.\n");
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out
}

fn describe_exit(run: &ToolRun) -> String {
    if run.timed_out {
        return "The converter timed out and was killed.".to_string();
    }
    match run.exit_code {
        Some(code) => format!("Exit code: {code}"),
        None => "Terminated by signal.".to_string(),
    }
}

fn push_truncation(out: &mut String, stream: &str, truncated: usize) {
    if truncated > 0 {
        ensure_newline(out);
        let _ = writeln!(out, "[{stream} truncated {truncated} bytes]");
    }
}

fn ensure_newline(out: &mut String) {
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_input_names_the_file() {
        let report = render_outcome(
            "onnx2tf",
            &ConversionOutcome::MissingInput {
                input: PathBuf::from("ecko.onnx"),
            },
        );
        assert!(report.contains("Error: input file 'ecko.onnx' not found!"));
    }

    #[test]
    fn tool_failure_includes_streams_verbatim_and_hints() {
        let run = ToolRun {
            exit_code: Some(2),
            stdout: "loading graph\n".to_string(),
            stderr: "ModuleNotFoundError: No module named 'onnx'".to_string(),
            ..ToolRun::default()
        };
        let report = render_outcome("onnx2tf", &ConversionOutcome::ToolFailed(run));
        assert!(report.contains("Exit code: 2"));
        assert!(report.contains("--- onnx2tf STDOUT ---\nloading graph\n--- onnx2tf STDERR ---"));
        assert!(report.contains("ModuleNotFoundError: No module named 'onnx'\n"));
        assert!(report.contains(REQUIRED_PACKAGES));
    }

    #[test]
    fn tool_failure_reports_timeout_and_truncation() {
        let run = ToolRun {
            timed_out: true,
            stdout: "partial".to_string(),
            stdout_truncated: 42,
            ..ToolRun::default()
        };
        let report = render_outcome("onnx2tf", &ConversionOutcome::ToolFailed(run));
        assert!(report.contains("timed out"));
        assert!(report.contains("partial\n[stdout truncated 42 bytes]\n"));
    }

    #[test]
    fn no_artifact_is_distinct_from_tool_failure() {
        let report = render_outcome(
            "onnx2tf",
            &ConversionOutcome::NoArtifact {
                work_dir: PathBuf::from("saved_model_temp"),
                extension: "tflite".to_string(),
            },
        );
        assert!(report.contains("no .tflite file was found in 'saved_model_temp'"));
        assert!(!report.contains("Hint:"));
    }

    #[test]
    fn success_names_destination() {
        let report = render_outcome(
            "onnx2tf",
            &ConversionOutcome::Converted {
                destination: PathBuf::from("ecko.tflite"),
                artifact: "ecko_float32.tflite".to_string(),
            },
        );
        assert!(report.contains("SUCCESS"));
        assert!(report.contains("File name: ecko.tflite"));
    }
}
