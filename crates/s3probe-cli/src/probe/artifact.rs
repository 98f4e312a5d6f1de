//! The transient object written and removed by each probe run.

use bytes::Bytes;
use jiff::Zoned;

/// Key prefix of every test object.
pub const KEY_PREFIX: &str = "test-connection-";

/// A uniquely named text object scoped to one probe run.
///
/// The key carries the run's Unix timestamp in seconds, so runs started in
/// different seconds never collide. Runs within the same second do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestArtifact {
    /// Object key, `test-connection-<unix-seconds>.txt`.
    pub key: String,
    /// Body written to and expected back from the bucket.
    pub contents: Bytes,
}

impl TestArtifact {
    /// Content type the artifact is uploaded with.
    pub const CONTENT_TYPE: &str = "text/plain";

    /// Artifact for a run starting now, in the system time zone.
    pub fn now() -> Self {
        Self::at(&Zoned::now())
    }

    /// Artifact for a run starting at `now`.
    pub fn at(now: &Zoned) -> Self {
        let key = format!("{KEY_PREFIX}{}.txt", now.timestamp().as_second());
        let contents = format!(
            "S3 connection test - {}",
            now.strftime("%Y-%m-%d %H:%M:%S")
        );

        Self {
            key,
            contents: Bytes::from(contents),
        }
    }
}
