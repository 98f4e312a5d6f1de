//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so they never interleave with the probe's stdout report.
/// Escape codes are emitted only when `ansi` is set.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(verbose: bool, ansi: bool) -> anyhow::Result<()> {
    tracing::init_tracing(verbose, ansi).context("Failed to initialize tracing")
}
