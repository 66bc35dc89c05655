//! Test-only helpers: a scripted converter and a throwaway workspace.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tempfile::TempDir;

use crate::core::types::ToolRun;
use crate::io::converter::{ConvertRequest, Converter};

/// Converter that writes predetermined files into the work directory and then
/// returns a predetermined result, without spawning anything.
pub struct ScriptedConverter {
    files: Vec<(String, Vec<u8>)>,
    result: std::result::Result<ToolRun, String>,
    calls: Cell<usize>,
}

impl ScriptedConverter {
    /// Exit 0 after writing `files`. An empty list leaves the work directory uncreated.
    pub fn producing(files: &[(&str, &str)]) -> Self {
        Self::with_result(
            Ok(ToolRun {
                exit_code: Some(0),
                ..ToolRun::default()
            }),
            files,
        )
    }

    /// Return `run` (expected to be a failure) after writing `files`.
    pub fn failing(run: ToolRun, files: &[(&str, &str)]) -> Self {
        Self::with_result(Ok(run), files)
    }

    /// Return an error after writing `files`.
    pub fn erroring(message: &str, files: &[(&str, &str)]) -> Self {
        Self::with_result(Err(message.to_string()), files)
    }

    fn with_result(
        result: std::result::Result<ToolRun, String>,
        files: &[(&str, &str)],
    ) -> Self {
        Self {
            files: files
                .iter()
                .map(|(name, bytes)| (name.to_string(), bytes.as_bytes().to_vec()))
                .collect(),
            result,
            calls: Cell::new(0),
        }
    }

    /// Number of times `convert` was called.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Converter for ScriptedConverter {
    fn convert(&self, request: &ConvertRequest) -> Result<ToolRun> {
        self.calls.set(self.calls.get() + 1);
        if !self.files.is_empty() {
            fs::create_dir_all(&request.work_dir)?;
        }
        for (name, bytes) in &self.files {
            fs::write(request.work_dir.join(name), bytes)?;
        }
        self.result.clone().map_err(|message| anyhow!(message))
    }
}

/// Temporary directory laid out like a project folder: `ecko.onnx` as input,
/// `ecko.tflite` as output, `saved_model_temp` as work directory.
pub struct Workspace {
    temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn input_path(&self) -> PathBuf {
        self.root().join("ecko.onnx")
    }

    /// Write a placeholder model to the input path.
    pub fn write_input(&self) {
        fs::write(self.input_path(), b"onnx-model").expect("write input");
    }

    pub fn request(&self) -> ConvertRequest {
        ConvertRequest {
            input: self.input_path(),
            output: self.root().join("ecko.tflite"),
            work_dir: self.root().join("saved_model_temp"),
            target_extension: "tflite".to_string(),
            timeout: None,
            output_limit_bytes: 10_000,
        }
    }

    /// Sorted names of the workspace's immediate entries.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .expect("read workspace")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
