//! Converter configuration stored in `onnx2tflite.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "onnx2tflite.toml";

/// Converter configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the values the
/// tool ships with, so an absent file is equivalent to an empty one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Model to convert when no input is given on the command line.
    pub input: PathBuf,

    /// Scratch directory handed to the converter. Removed after every run.
    pub work_dir: PathBuf,

    /// Extension (without the dot) of the artifact to pick up.
    pub target_extension: String,

    /// Kill the converter after this many seconds. Unset waits forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Keep at most this many bytes of converter stdout/stderr each.
    pub output_limit_bytes: usize,

    pub tool: ToolConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Program and leading arguments (e.g. `["python3","-m","onnx2tf"]`).
    pub command: Vec<String>,
    /// Flag preceding the input model path.
    pub input_flag: String,
    /// Flag preceding the output directory.
    pub output_flag: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "python3".to_string(),
                "-m".to_string(),
                "onnx2tf".to_string(),
            ],
            input_flag: "-i".to_string(),
            output_flag: "-o".to_string(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("ecko.onnx"),
            work_dir: PathBuf::from("saved_model_temp"),
            target_extension: "tflite".to_string(),
            timeout_secs: None,
            output_limit_bytes: 1_000_000,
            tool: ToolConfig::default(),
        }
    }
}

impl ConverterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(anyhow!("input must not be empty"));
        }
        if self.work_dir.as_os_str().is_empty() {
            return Err(anyhow!("work_dir must not be empty"));
        }
        let ext = self.target_extension.trim();
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            return Err(anyhow!(
                "target_extension must be a bare extension like \"tflite\""
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be > 0 when set"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.tool.command.is_empty() || self.tool.command[0].trim().is_empty() {
            return Err(anyhow!("tool.command must be a non-empty array"));
        }
        if self.tool.input_flag.trim().is_empty() || self.tool.output_flag.trim().is_empty() {
            return Err(anyhow!("tool.input_flag and tool.output_flag must be set"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Short name of the converter for console messages: the module after
    /// `-m` when present, otherwise the program's file name.
    pub fn tool_name(&self) -> String {
        let command = &self.tool.command;
        if let Some(pos) = command.iter().position(|arg| arg == "-m")
            && let Some(module) = command.get(pos + 1)
        {
            return module.clone();
        }
        command
            .first()
            .map(|program| {
                Path::new(program)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| program.clone())
            })
            .unwrap_or_else(|| "converter".to_string())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ConverterConfig::default()`.
pub fn load_config(path: &Path) -> Result<ConverterConfig> {
    if !path.exists() {
        let cfg = ConverterConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ConverterConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ConverterConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
