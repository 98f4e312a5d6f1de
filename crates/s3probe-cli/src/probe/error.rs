//! Probe failure types.

use std::io;

use s3probe_object::types::{Error as StorageError, ErrorKind};

use super::Step;

/// Result type for probe runs.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Why a probe run stopped.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// A check ran but its assertion did not hold.
    #[error("{step} check failed: {reason}")]
    Check {
        /// Step that failed.
        step: Step,
        /// What was observed.
        reason: String,
    },

    /// The storage service rejected or failed a request.
    #[error("storage service error: {message}")]
    Service {
        /// Message reported by the client.
        message: String,
        /// Provider error code, e.g. `NoSuchBucket`.
        code: Option<String>,
        /// HTTP status of the failed request.
        status: Option<u16>,
    },

    /// Anything else: configuration, local I/O, client construction.
    #[error("unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl ProbeError {
    /// Creates a check failure for `step`.
    pub fn check(step: Step, reason: impl Into<String>) -> Self {
        Self::Check {
            step,
            reason: reason.into(),
        }
    }

    /// Step at which the run stopped, for check failures.
    #[cfg(test)]
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Check { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<StorageError> for ProbeError {
    fn from(err: StorageError) -> Self {
        match err.kind() {
            ErrorKind::Service => Self::Service {
                message: err.message().to_string(),
                code: err.code().map(str::to_string),
                status: err.status(),
            },
            ErrorKind::Configuration | ErrorKind::Unexpected => {
                Self::Unexpected(anyhow::Error::new(err))
            }
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        Self::Unexpected(anyhow::Error::new(err).context("failed to write console output"))
    }
}
