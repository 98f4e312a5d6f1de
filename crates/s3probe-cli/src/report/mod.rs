//! Human-readable probe output.

mod configuration;
mod console;

use std::io::{self, Write};

pub use configuration::display_configuration;
pub use console::Console;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::probe::{ProbeError, ProbeReport};

/// Formats `ts` as `YYYY-MM-DD HH:MM:SS` in the system time zone.
pub fn format_local(ts: Timestamp) -> String {
    ts.to_zoned(TimeZone::system())
        .strftime("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Prints the final banner for a successful run, or the failure details.
pub fn outcome<W: Write>(
    console: &mut Console<W>,
    result: &Result<ProbeReport, ProbeError>,
    verbose: bool,
) -> io::Result<()> {
    match result {
        Ok(_) => {
            console.new_line()?;
            console.info("✨ All checks passed!")?;
            console.info("🎉 The object storage connection is working correctly!")
        }
        // The failing step already printed its own line.
        Err(ProbeError::Check { .. }) => Ok(()),
        Err(ProbeError::Service {
            message,
            code,
            status,
        }) => {
            console.new_line()?;
            console.error(format!("❌ S3 error: {message}"))?;
            if verbose {
                console.error(format!("Error code: {}", code.as_deref().unwrap_or("N/A")))?;
                let status = status.map_or_else(|| "N/A".to_string(), |s| s.to_string());
                console.error(format!("Status: {status}"))?;
            }
            Ok(())
        }
        Err(ProbeError::Unexpected(error)) => {
            console.new_line()?;
            console.error(format!("❌ General error: {error:#}"))?;
            if verbose {
                console.error(format!("Trace: {error:?}"))?;
            }
            Ok(())
        }
    }
}
