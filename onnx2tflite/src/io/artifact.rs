//! Locating the converter's artifact and moving it into place.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::paths::has_extension;

/// First regular file among the immediate entries of `dir` whose name ends
/// with `.{extension}`.
///
/// "First" is directory-listing order, which the platform defines. When more
/// than one candidate exists the choice is logged as a warning together with
/// every candidate. A missing `dir` yields `None`.
pub fn find_artifact(dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "work directory missing");
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("read {}", dir.display())),
    };

    let mut candidates: Vec<OsString> = Vec::new();
    let mut found = None;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let name = entry.file_name();
        if !has_extension(&name, extension) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if found.is_none() {
            found = Some(path);
        }
        candidates.push(name);
    }

    if candidates.len() > 1 {
        warn!(
            ?candidates,
            chosen = ?found.as_deref().and_then(Path::file_name),
            "multiple artifacts matched, taking the first listed"
        );
    }
    Ok(found)
}

/// Move `artifact` to `destination`, replacing any file already there.
///
/// Falls back to copy + delete when the rename fails, e.g. across filesystems.
pub fn install_artifact(artifact: &Path, destination: &Path) -> Result<()> {
    if destination.exists() {
        debug!(destination = %destination.display(), "removing previous output");
        fs::remove_file(destination)
            .with_context(|| format!("remove existing {}", destination.display()))?;
    }
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }

    if let Err(e) = fs::rename(artifact, destination) {
        debug!(err = %e, "rename failed, copying instead");
        fs::copy(artifact, destination).with_context(|| {
            format!("copy {} to {}", artifact.display(), destination.display())
        })?;
        fs::remove_file(artifact).with_context(|| format!("remove {}", artifact.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_matching_file_and_skips_others() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("saved_model.pb"), b"pb").expect("write");
        fs::create_dir_all(temp.path().join("variables.tflite")).expect("mkdir");
        fs::write(temp.path().join("net_float32.tflite"), b"tfl3").expect("write");

        let found = find_artifact(temp.path(), "tflite").expect("scan");
        assert_eq!(found, Some(temp.path().join("net_float32.tflite")));
    }

    #[test]
    fn ignores_nested_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(temp.path().join("sub")).expect("mkdir");
        fs::write(temp.path().join("sub").join("deep.tflite"), b"tfl3").expect("write");

        assert_eq!(find_artifact(temp.path(), "tflite").expect("scan"), None);
    }

    #[test]
    fn missing_directory_has_no_artifact() {
        let temp = tempfile::tempdir().expect("tempdir");
        let found = find_artifact(&temp.path().join("absent"), "tflite").expect("scan");
        assert_eq!(found, None);
    }

    #[test]
    fn picks_one_of_several_candidates() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("a_float16.tflite"), b"16").expect("write");
        fs::write(temp.path().join("a_float32.tflite"), b"32").expect("write");

        let found = find_artifact(temp.path(), "tflite")
            .expect("scan")
            .expect("candidate");
        assert!(found.starts_with(temp.path()));
        assert!(has_extension(found.file_name().expect("name"), "tflite"));
    }

    #[test]
    fn install_replaces_existing_destination() {
        let temp = tempfile::tempdir().expect("tempdir");
        let artifact = temp.path().join("model_float32.tflite");
        let destination = temp.path().join("out").join("ecko.tflite");
        fs::write(&artifact, b"new").expect("write");
        fs::create_dir_all(destination.parent().expect("parent")).expect("mkdir");
        fs::write(&destination, b"old").expect("write");

        install_artifact(&artifact, &destination).expect("install");
        assert_eq!(fs::read(&destination).expect("read"), b"new");
        assert!(!artifact.exists());
    }
}
