//! Object metadata returned by HEAD requests.

use jiff::Timestamp;
use object_store::ObjectMeta;

use super::Error;

/// Size and modification time of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Object key within the bucket.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time reported by the service.
    pub last_modified: Timestamp,
    /// Entity tag, if the backend provides one.
    pub e_tag: Option<String>,
}

impl TryFrom<ObjectMeta> for ObjectMetadata {
    type Error = Error;

    fn try_from(meta: ObjectMeta) -> Result<Self, Self::Error> {
        let last_modified = Timestamp::new(
            meta.last_modified.timestamp(),
            meta.last_modified.timestamp_subsec_nanos() as i32,
        )
        .map_err(|e| Error::unexpected(&e, "object-meta").with_source(e))?;

        Ok(Self {
            key: meta.location.to_string(),
            size: meta.size,
            last_modified,
            e_tag: meta.e_tag,
        })
    }
}
