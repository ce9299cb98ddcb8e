use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use fra_ingest::config::PipelineConfig;

mod detect;
mod import;
mod validate;

/// fra-ingest - Transformer FRA file importer
#[derive(Parser)]
#[command(name = "fra-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect, parse, validate and normalize an FRA file
    Import {
        /// Input measurement file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to TOML config file
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Resample onto this many log-spaced frequencies
        #[arg(long, value_name = "POINTS")]
        resample: Option<usize>,

        /// Write the normalized data as JSON to this path
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Pretty-print the import summary
        #[arg(long)]
        pretty: bool,
    },

    /// Report which parser claims a file
    Detect {
        /// Input measurement file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to TOML config file
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Parse and validate an FRA file without normalizing it
    Validate {
        /// Input measurement file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to TOML config file
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import {
            file,
            config,
            resample,
            output,
            pretty,
        } => import::run(file, config, resample, output, pretty),
        Commands::Detect { file, config } => detect::run(file, config),
        Commands::Validate { file, config } => validate::run(file, config),
    }
}

/// Config file (or defaults), then `FRA_*` environment overrides
fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Read the input file, returning its display name and content
fn read_input(file: &Path) -> Result<(String, Vec<u8>)> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    Ok((name, bytes))
}
