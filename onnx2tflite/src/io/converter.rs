//! Converter abstraction for the external format translation.
//!
//! The [`Converter`] trait decouples the conversion driver from the actual
//! backend (by default `python3 -m onnx2tf`). Tests use scripted converters that
//! drop files into the work directory without spawning processes.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument, warn};

use crate::core::types::ToolRun;
use crate::io::config::{ConverterConfig, ToolConfig};
use crate::io::process::run_command;

/// Parameters for a single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    /// Model file to convert.
    pub input: PathBuf,
    /// Final location of the converted artifact.
    pub output: PathBuf,
    /// Directory the converter writes into. Owned by the driver and removed afterwards.
    pub work_dir: PathBuf,
    /// Extension (without the dot) of the artifact to collect.
    pub target_extension: String,
    /// Maximum time to wait for the converter. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Keep at most this many bytes of each captured stream.
    pub output_limit_bytes: usize,
}

impl ConvertRequest {
    /// Build a request from config, with `input` and `output` already resolved.
    pub fn from_config(cfg: &ConverterConfig, input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            work_dir: cfg.work_dir.clone(),
            target_extension: cfg.target_extension.clone(),
            timeout: cfg.timeout(),
            output_limit_bytes: cfg.output_limit_bytes,
        }
    }
}

/// Abstraction over conversion backends.
pub trait Converter {
    /// Run the conversion of `request.input` into `request.work_dir` and report how it went.
    ///
    /// A nonzero exit is a successful call returning a failed [`ToolRun`]; `Err` is
    /// reserved for being unable to run the backend at all.
    fn convert(&self, request: &ConvertRequest) -> Result<ToolRun>;
}

/// Converter that spawns the configured command line.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    tool: ToolConfig,
}

impl CommandConverter {
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    /// `<command...> <input_flag> <input> <output_flag> <work_dir>`
    pub fn build_command(&self, request: &ConvertRequest) -> Result<Command> {
        let (program, args) = self
            .tool
            .command
            .split_first()
            .ok_or_else(|| anyhow!("converter command is empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg(&self.tool.input_flag)
            .arg(&request.input)
            .arg(&self.tool.output_flag)
            .arg(&request.work_dir);
        Ok(cmd)
    }
}

impl Converter for CommandConverter {
    #[instrument(skip_all, fields(input = %request.input.display(), work_dir = %request.work_dir.display()))]
    fn convert(&self, request: &ConvertRequest) -> Result<ToolRun> {
        let cmd = self.build_command(request)?;
        info!(command = ?self.tool.command, "starting converter");

        let output = run_command(cmd, request.timeout, request.output_limit_bytes)
            .context("run converter")?;

        let run = ToolRun {
            exit_code: output.status.code(),
            timed_out: output.timed_out,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            stdout_truncated: output.stdout_truncated,
            stderr_truncated: output.stderr_truncated,
        };
        if run.success() {
            debug!("converter completed successfully");
        } else {
            warn!(exit_code = ?run.exit_code, timed_out = run.timed_out, "converter failed");
        }
        Ok(run)
    }
}
