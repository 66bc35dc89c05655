//! Shared types passed between the converter backend, the driver and the
//! console report.

use std::path::PathBuf;

/// Result of one converter invocation.
///
/// Streams are captured as lossy UTF-8 and bounded by the configured output
/// limit; the truncated byte counts record what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRun {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
}

impl ToolRun {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Terminal state of a single conversion pass.
///
/// Every variant other than `Converted` is a recognised failure that is
/// reported to the user rather than propagated as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The artifact was moved to `destination`.
    Converted {
        destination: PathBuf,
        /// File name the converter gave the artifact inside the work directory.
        artifact: String,
    },
    /// The input model does not exist. Nothing was run.
    MissingInput { input: PathBuf },
    /// The converter exited nonzero, was killed, or timed out.
    ToolFailed(ToolRun),
    /// The converter succeeded but left no file with the target extension.
    NoArtifact { work_dir: PathBuf, extension: String },
}
