//! Scoped ownership of the converter's work directory.

use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

/// Guard for the directory the converter writes into.
///
/// The directory is removed when the guard is dropped, on every exit path of the
/// conversion (normal return, early `?` return, panic unwind). Removal errors are
/// logged and otherwise ignored.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Take ownership of `path`, clearing whatever an earlier run left there so
    /// stale artifacts cannot be picked up. The directory itself is not created;
    /// the converter does that.
    ///
    /// Refuses when any of `keep` is `path` itself or lies beneath it, since the
    /// directory is wiped both now and on drop.
    pub fn claim(path: &Path, keep: &[&Path]) -> Result<Self> {
        let root = resolve(path)?;
        for kept in keep {
            if resolve(kept)?.starts_with(&root) {
                bail!(
                    "{} is inside the work directory {}, which is deleted after every run; choose another work_dir",
                    kept.display(),
                    path.display()
                );
            }
        }
        if path.exists() {
            debug!(path = %path.display(), "removing stale work directory");
            fs::remove_dir_all(path)
                .with_context(|| format!("remove stale work directory {}", path.display()))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed work directory"),
            Err(e) => warn!(path = %self.path.display(), err = %e, "failed to remove work directory"),
        }
    }
}

/// Absolute form of `path`, with symlinks resolved through its deepest existing
/// ancestor. Components below that ancestor are appended unchanged.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("read current directory")?
            .join(path)
    };

    let mut missing: Vec<OsString> = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        if let Ok(mut resolved) = existing.canonicalize() {
            for name in missing.iter().rev() {
                resolved.push(name);
            }
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}
