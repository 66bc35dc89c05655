//! Orchestration for a single conversion pass.

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::core::types::ConversionOutcome;
use crate::io::artifact::{find_artifact, install_artifact};
use crate::io::converter::{ConvertRequest, Converter};
use crate::io::scratch::ScratchDir;

/// Convert `request.input` and place the artifact at `request.output`.
///
/// Checks the input, runs the converter into the work directory, picks up the
/// first file with the target extension and moves it over any previous output.
/// The work directory is gone when this returns, whatever the outcome.
///
/// Recognised failures (missing input, converter failure, no artifact) come back
/// as `Ok` outcomes for the caller to report. `Err` means something unexpected,
/// such as the converter not starting, the move failing, or the input or output
/// lying inside the work directory.
pub fn convert_model<C: Converter>(
    converter: &C,
    request: &ConvertRequest,
) -> Result<ConversionOutcome> {
    convert_model_with(converter, request, |_| {})
}

/// Like [`convert_model`], calling `on_start` once the input has been found and
/// right before the converter runs.
#[instrument(skip_all, fields(input = %request.input.display(), output = %request.output.display()))]
pub fn convert_model_with<C, F>(
    converter: &C,
    request: &ConvertRequest,
    on_start: F,
) -> Result<ConversionOutcome>
where
    C: Converter,
    F: FnOnce(&ConvertRequest),
{
    if !request.input.exists() {
        warn!("input model not found");
        return Ok(ConversionOutcome::MissingInput {
            input: request.input.clone(),
        });
    }

    let scratch = ScratchDir::claim(
        &request.work_dir,
        &[request.input.as_path(), request.output.as_path()],
    )?;

    on_start(request);

    let run = converter.convert(request)?;
    if !run.success() {
        return Ok(ConversionOutcome::ToolFailed(run));
    }

    let Some(artifact) = find_artifact(scratch.path(), &request.target_extension)? else {
        warn!(work_dir = %scratch.path().display(), "converter produced no artifact");
        return Ok(ConversionOutcome::NoArtifact {
            work_dir: request.work_dir.clone(),
            extension: request.target_extension.clone(),
        });
    };

    install_artifact(&artifact, &request.output).context("move artifact into place")?;
    let artifact = artifact
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(artifact, "conversion finished");
    Ok(ConversionOutcome::Converted {
        destination: request.output.clone(),
        artifact,
    })
}
