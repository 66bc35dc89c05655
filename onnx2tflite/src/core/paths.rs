//! Path rules for inputs, destinations and converter artifacts.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Destination for a converted model: the input path with its extension
/// replaced by `extension` (`ecko.onnx` -> `ecko.tflite`).
///
/// Inputs without an extension gain one; leading-dot names such as
/// `.model` are treated as having no extension.
pub fn derive_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Whether `name` ends with `.{extension}`.
///
/// Matching is on the raw suffix, so a bare `.tflite` file name also counts.
pub fn has_extension(name: &OsStr, extension: &str) -> bool {
    let suffix = format!(".{extension}");
    name.to_str().is_some_and(|name| name.ends_with(&suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_extension() {
        assert_eq!(
            derive_output_path(Path::new("ecko.onnx"), "tflite"),
            PathBuf::from("ecko.tflite")
        );
        assert_eq!(
            derive_output_path(Path::new("models/v2/net.opt.onnx"), "tflite"),
            PathBuf::from("models/v2/net.opt.tflite")
        );
    }

    #[test]
    fn appends_extension_when_missing() {
        assert_eq!(
            derive_output_path(Path::new("model"), "tflite"),
            PathBuf::from("model.tflite")
        );
        assert_eq!(
            derive_output_path(Path::new(".model"), "tflite"),
            PathBuf::from(".model.tflite")
        );
    }

    #[test]
    fn matches_suffix_only() {
        assert!(has_extension(OsStr::new("model_float32.tflite"), "tflite"));
        assert!(has_extension(OsStr::new(".tflite"), "tflite"));
        assert!(!has_extension(OsStr::new("model.tflite.json"), "tflite"));
        assert!(!has_extension(OsStr::new("tflite"), "tflite"));
        assert!(!has_extension(OsStr::new("saved_model.pb"), "tflite"));
    }
}
