#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod probe;
mod report;
mod telemetry;

use std::process;

use crate::config::Cli;
use crate::report::Console;

// Tracing target constants
pub const TRACING_TARGET_CONFIG: &str = "s3probe_cli::config";
pub const TRACING_TARGET_PROBE: &str = "s3probe_cli::probe";

#[tokio::main]
async fn main() {
    let cli = Cli::init();

    if let Err(error) = telemetry::init_tracing(cli.verbose, !cli.no_color) {
        eprintln!("Warning: {error:#}");
    }
    cli.log();

    let mut console = Console::stdout(!cli.no_color);
    let result = probe::run(&cli, &mut console).await;

    if let Err(error) = report::outcome(&mut console, &result, cli.verbose) {
        eprintln!("Error: failed to write report: {error}");
    }

    let Err(error) = result else {
        process::exit(0);
    };

    tracing::debug!(
        target: TRACING_TARGET_PROBE,
        error = %error,
        "probe terminated with error"
    );
    process::exit(1);
}
