//! Stable exit codes for the CLI.

use crate::core::types::ConversionOutcome;

/// Conversion finished, or `init` wrote the config.
pub const OK: i32 = 0;
/// Invalid configuration, refused overwrite, or an unexpected error.
pub const INVALID: i32 = 1;
/// The input model does not exist.
pub const MISSING_INPUT: i32 = 2;
/// The converter exited nonzero, was killed, or timed out.
pub const TOOL_FAILED: i32 = 3;
/// The converter succeeded but produced no artifact with the target extension.
pub const NO_ARTIFACT: i32 = 4;

pub fn for_outcome(outcome: &ConversionOutcome) -> i32 {
    match outcome {
        ConversionOutcome::Converted { .. } => OK,
        ConversionOutcome::MissingInput { .. } => MISSING_INPUT,
        ConversionOutcome::ToolFailed(_) => TOOL_FAILED,
        ConversionOutcome::NoArtifact { .. } => NO_ARTIFACT,
    }
}
