//! Object-store client backed by [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a thin, cloneable wrapper around
//! `Arc<dyn ObjectStore>` that exposes the handful of calls a connectivity
//! check needs. Every public method is instrumented with [`tracing`].

use std::sync::Arc;

use bytes::Bytes;
use object_store::path::Path;
use object_store::{ObjectStore, PutMode, PutOptions, PutPayload};

use crate::types::{Error, ObjectMetadata};

mod output;

pub use output::{GetOutput, PutOutput};

/// Prefix listed by [`ObjectStoreClient::bucket_exists`].
///
/// Listing a prefix nobody writes to keeps the request to a single small page.
const BUCKET_PROBE_PREFIX: &str = "_s3probe_bucket_check";

/// Cloneable handle to an [`ObjectStore`] backend.
///
/// All methods accept plain string keys and convert them to
/// [`object_store::path::Path`] internally.
#[derive(Clone, Debug)]
pub struct ObjectStoreClient(pub Arc<dyn ObjectStore>);

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation.
    pub fn new(store: impl ObjectStore) -> Self {
        Self(Arc::new(store))
    }

    /// Check whether the configured bucket exists and is reachable.
    ///
    /// Issues a delimited LIST under a probe prefix. A missing-bucket response
    /// yields `Ok(false)`; any other failure is propagated.
    #[tracing::instrument(name = "object.bucket_exists", skip(self))]
    pub async fn bucket_exists(&self) -> Result<bool, Error> {
        let prefix = Path::from(BUCKET_PROBE_PREFIX);
        match self.0.list_with_delimiter(Some(&prefix)).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = Error::from_object_store(e);
                if err.is_missing_bucket() {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Retrieve the raw bytes, content-type, and metadata stored at `key`.
    #[tracing::instrument(name = "object.get", skip(self), fields(key))]
    pub async fn get(&self, key: &str) -> Result<GetOutput, Error> {
        let path = Path::from(key);
        let result = self.0.get(&path).await.map_err(Error::from_object_store)?;
        let metadata = ObjectMetadata::try_from(result.meta.clone())?;
        let content_type = result
            .attributes
            .get(&object_store::Attribute::ContentType)
            .map(|v| v.to_string());
        let data = result.bytes().await.map_err(Error::from_object_store)?;
        Ok(GetOutput {
            data,
            content_type,
            metadata,
        })
    }

    /// Upload `data` to `key`, overwriting any existing object.
    #[tracing::instrument(name = "object.put", skip(self, data), fields(key, size = data.len()))]
    pub async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<PutOutput, Error> {
        let path = Path::from(key);
        let payload = PutPayload::from(data);
        let mut opts = PutOptions {
            mode: PutMode::Overwrite,
            ..Default::default()
        };
        if let Some(ct) = content_type {
            opts.attributes
                .insert(object_store::Attribute::ContentType, ct.to_string().into());
        }
        let result = self
            .0
            .put_opts(&path, payload, opts)
            .await
            .map_err(Error::from_object_store)?;
        Ok(result.into())
    }

    /// Get object metadata without downloading the body.
    #[tracing::instrument(name = "object.head", skip(self), fields(key))]
    pub async fn head(&self, key: &str) -> Result<ObjectMetadata, Error> {
        let path = Path::from(key);
        let meta = self.0.head(&path).await.map_err(Error::from_object_store)?;
        ObjectMetadata::try_from(meta)
    }

    /// Check whether an object exists at `key`.
    ///
    /// A not-found response yields `Ok(false)`; any other error is propagated.
    #[tracing::instrument(name = "object.exists", skip(self), fields(key))]
    pub async fn exists(&self, key: &str) -> Result<bool, Error> {
        let path = Path::from(key);
        match self.0.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(Error::from_object_store(e)),
        }
    }

    /// Delete the object at `key`.
    #[tracing::instrument(name = "object.delete", skip(self), fields(key))]
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        let path = Path::from(key);
        self.0.delete(&path).await.map_err(Error::from_object_store)
    }
}
