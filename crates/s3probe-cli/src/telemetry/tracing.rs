//! Tracing initialization and configuration.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Default filter directives.
const DEFAULT_DIRECTIVES: &str = "warn";

/// Filter directives used with `--verbose`.
const VERBOSE_DIRECTIVES: &str = "warn,s3probe_cli=info,s3probe_object=info";

/// Initializes the tracing subscriber for structured logging.
///
/// # Configuration
///
/// The log level can be configured via the `RUST_LOG` environment variable.
/// If not set, only warnings are shown, or probe progress with `--verbose`.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug s3probe
/// RUST_LOG=s3probe_object=trace s3probe --disk vultr
/// ```
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(super) fn init_tracing(verbose: bool, ansi: bool) -> anyhow::Result<()> {
    let env_filter = create_env_filter(verbose)?;

    tracing_subscriber::registry()
        .with(create_fmt_layer(ansi, std::io::stderr))
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

/// Creates the formatting layer. Escape codes are emitted only when `ansi` is set.
fn create_fmt_layer<S, W>(ansi: bool, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(ansi)
}

/// Creates an environment filter for tracing.
fn create_env_filter(verbose: bool) -> anyhow::Result<EnvFilter> {
    let directives = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}
