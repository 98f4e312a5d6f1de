//! The [`Disk`] abstraction: one bucket on one storage backend.

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::ObjectStoreClient;
use crate::providers::UrlGenerator;
use crate::types::{ObjectMetadata, Result};

/// Key-addressed object operations against a single bucket.
#[async_trait]
pub trait Disk: Send + Sync {
    /// Name of the bucket this disk addresses.
    fn bucket(&self) -> &str;

    /// Whether the bucket exists and is reachable.
    async fn bucket_exists(&self) -> Result<bool>;

    /// Store `contents` at `key`, replacing any existing object.
    async fn put(&self, key: &str, contents: Bytes, content_type: Option<&str>) -> Result<()>;

    /// Read the full body stored at `key`.
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Public URL of `key`. Does not touch the network.
    fn url(&self, key: &str) -> Result<String>;

    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Size and last-modified time of the object at `key`.
    async fn metadata(&self, key: &str) -> Result<ObjectMetadata>;

    /// Remove the object at `key`.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// A [`Disk`] backed by an [`ObjectStoreClient`].
#[derive(Debug, Clone)]
pub struct StorageDisk {
    bucket: String,
    client: ObjectStoreClient,
    urls: UrlGenerator,
}

impl StorageDisk {
    /// Creates a disk over `client` for `bucket`.
    pub fn new(bucket: impl Into<String>, client: ObjectStoreClient, urls: UrlGenerator) -> Self {
        Self {
            bucket: bucket.into(),
            client,
            urls,
        }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &ObjectStoreClient {
        &self.client
    }
}

#[async_trait]
impl Disk for StorageDisk {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> Result<bool> {
        self.client.bucket_exists().await
    }

    async fn put(&self, key: &str, contents: Bytes, content_type: Option<&str>) -> Result<()> {
        self.client.put(key, contents, content_type).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        Ok(self.client.get(key).await?.data)
    }

    fn url(&self, key: &str) -> Result<String> {
        Ok(self.urls.url(key)?.into())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.client.exists(key).await
    }

    async fn metadata(&self, key: &str) -> Result<ObjectMetadata> {
        self.client.head(key).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client.delete(key).await
    }
}
