//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── disk: String          # which named disk to check
//! ├── verbose: bool         # configuration table + error diagnostics
//! ├── config: Option<Path>  # JSON disk file (else VULTR_* variables)
//! └── no_color: bool
//! ```
//!
//! All options can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! s3probe --disk vultr --verbose
//!
//! # Or with a disk file
//! S3PROBE_CONFIG=./filesystems.json s3probe --disk backup
//! ```

mod filesystems;

use std::path::PathBuf;
use std::process;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
pub use filesystems::{DEFAULT_DISK, DiskConfig, Driver, FilesystemsConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "s3probe")]
#[command(about = "Check connectivity to an S3-compatible object storage disk")]
#[command(version)]
pub struct Cli {
    /// Name of the configured disk to check.
    #[arg(long, env = "S3PROBE_DISK", default_value = DEFAULT_DISK)]
    pub disk: String,

    /// Show the disk configuration and detailed error diagnostics.
    #[arg(short, long)]
    #[serde(default)]
    pub verbose: bool,

    /// JSON file describing named disks.
    ///
    /// When omitted, the `vultr` disk is built from `VULTR_*` environment
    /// variables.
    #[arg(long, env = "S3PROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output.
    ///
    /// `NO_COLOR` follows the usual convention: any value other than an
    /// empty string, `0`, `false`, `no`, `off`, `n` or `f` disables color.
    #[arg(
        long,
        env = "NO_COLOR",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = FalseyValueParser::new(),
    )]
    #[serde(default)]
    pub no_color: bool,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so that clap's `env` feature and the
    /// `VULTR_*` fallback can both see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs the parsed options and build information at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            disk = %self.disk,
            verbose = self.verbose,
            config = ?self.config,
            "Probe options"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
