//! Results returned by [`ObjectStoreClient`](super::ObjectStoreClient) reads and writes.

use bytes::Bytes;

use crate::types::ObjectMetadata;

/// Body and metadata of a downloaded object.
#[derive(Debug)]
pub struct GetOutput {
    /// Raw bytes of the object.
    pub data: Bytes,
    /// MIME content-type, if the backend stored one.
    pub content_type: Option<String>,
    /// Size, modification time and entity tag.
    pub metadata: ObjectMetadata,
}

/// Acknowledgement of a completed upload.
#[derive(Debug, Default)]
pub struct PutOutput {
    /// Entity tag of the stored object.
    pub e_tag: Option<String>,
    /// Version id, on versioned buckets.
    pub version: Option<String>,
}

impl From<object_store::PutResult> for PutOutput {
    fn from(r: object_store::PutResult) -> Self {
        Self {
            e_tag: r.e_tag,
            version: r.version,
        }
    }
}
