#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod client;
/// Storage disk abstraction used by connectivity checks.
pub mod disk;
/// Provider trait and the S3-compatible provider.
pub mod providers;
/// Error and metadata types.
pub mod types;

#[doc(hidden)]
pub mod prelude;

/// Tracing target for object storage operations.
pub const TRACING_TARGET: &str = "s3probe_object";
