//! Convert an ONNX model to TFLite with an external converter.
//!
//! Runs the converter into a scratch directory, moves the produced `.tflite`
//! next to the input and removes the scratch directory again.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};

use onnx2tflite::convert::convert_model_with;
use onnx2tflite::core::paths::derive_output_path;
use onnx2tflite::core::report::{render_outcome, render_start};
use onnx2tflite::exit_codes;
use onnx2tflite::io::config::{
    ConverterConfig, DEFAULT_CONFIG_PATH, load_config, write_config,
};
use onnx2tflite::io::converter::{CommandConverter, ConvertRequest};
use onnx2tflite::logging;

#[derive(Parser)]
#[command(
    name = "onnx2tflite",
    version,
    about = "Convert an ONNX model to TFLite using an external converter"
)]
struct Cli {
    /// Path to the TOML config file. Missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a model and place the result next to it.
    Convert(ConvertArgs),
    /// Write the default config file.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ConvertArgs {
    /// Model to convert. Defaults to `input` from the config.
    input: Option<PathBuf>,
    /// Destination file. Defaults to the input with the target extension.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Scratch directory for converter output.
    #[arg(long)]
    work_dir: Option<PathBuf>,
    /// Kill the converter after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Unexpected error: {:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Convert(args) => cmd_convert(&cli.config, args),
        Command::Init { force } => cmd_init(&cli.config, force),
    }
}

fn cmd_convert(config_path: &Path, args: ConvertArgs) -> Result<i32> {
    let cfg = apply_overrides(load_config(config_path)?, &args)?;
    let input = args.input.unwrap_or_else(|| cfg.input.clone());
    let output = args
        .output
        .unwrap_or_else(|| derive_output_path(&input, &cfg.target_extension));
    let tool = cfg.tool_name();
    let request = ConvertRequest::from_config(&cfg, input, output);
    let converter = CommandConverter::new(cfg.tool);

    let outcome = convert_model_with(&converter, &request, |request| {
        print!("{}", render_start(&tool, &request.input));
    })?;
    print!("{}", render_outcome(&tool, &outcome));
    Ok(exit_codes::for_outcome(&outcome))
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &ConverterConfig::default())?;
    println!("wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(mut cfg: ConverterConfig, args: &ConvertArgs) -> Result<ConverterConfig> {
    if let Some(work_dir) = &args.work_dir {
        cfg.work_dir = work_dir.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        cfg.timeout_secs = Some(timeout_secs);
    }
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_convert_defaults() {
        let cli = Cli::parse_from(["onnx2tflite", "convert"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.input, None);
        assert_eq!(args.output, None);
    }

    #[test]
    fn parse_convert_with_flags() {
        let cli = Cli::parse_from([
            "onnx2tflite",
            "convert",
            "net.onnx",
            "-o",
            "out/net.tflite",
            "--timeout-secs",
            "90",
            "--config",
            "cfg.toml",
        ]);
        assert_eq!(cli.config, PathBuf::from("cfg.toml"));
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.input, Some(PathBuf::from("net.onnx")));
        assert_eq!(args.output, Some(PathBuf::from("out/net.tflite")));
        assert_eq!(args.timeout_secs, Some(90));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["onnx2tflite", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn overrides_replace_config_values() {
        let args = ConvertArgs {
            work_dir: Some(PathBuf::from("scratch")),
            timeout_secs: Some(5),
            ..ConvertArgs::default()
        };
        let cfg = apply_overrides(ConverterConfig::default(), &args).expect("apply");
        assert_eq!(cfg.work_dir, PathBuf::from("scratch"));
        assert_eq!(cfg.timeout_secs, Some(5));
        assert_eq!(cfg.input, PathBuf::from("ecko.onnx"));
    }

    #[test]
    fn overrides_are_validated() {
        let args = ConvertArgs {
            timeout_secs: Some(0),
            ..ConvertArgs::default()
        };
        assert!(apply_overrides(ConverterConfig::default(), &args).is_err());
    }
}
