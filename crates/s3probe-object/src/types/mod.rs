//! Error and metadata types shared by the client and disk layers.

pub mod error;
pub mod metadata;

pub use error::{Error, ErrorKind, Result};
pub use metadata::ObjectMetadata;
