//! Client trait and the S3-compatible object storage provider.

mod provider;
mod public_url;
mod s3;

pub use provider::Client;
pub use public_url::UrlGenerator;
pub use s3::{S3Config, S3Provider};
