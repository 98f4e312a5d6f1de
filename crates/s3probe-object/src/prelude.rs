//! Convenience re-exports.

pub use crate::client::{GetOutput, ObjectStoreClient, PutOutput};
pub use crate::disk::{Disk, StorageDisk};
pub use crate::providers::{Client, S3Config, S3Provider, UrlGenerator};
pub use crate::types::{Error, ErrorKind, ObjectMetadata, Result};
