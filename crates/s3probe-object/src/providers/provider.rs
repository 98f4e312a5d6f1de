//! Provider trait for creating authenticated storage connections.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::types::Error;

/// Factory for creating an authenticated connection to a storage service.
///
/// Implementations turn typed credentials into a ready-to-use client for one
/// provider. Connecting performs no network I/O; reachability is checked by
/// the first request.
pub trait Client: Sized + Send + Sync + 'static {
    /// Strongly-typed credentials for this provider.
    type Credentials: DeserializeOwned + Send + Sync;

    /// Unique identifier (e.g. "s3").
    const ID: &str;

    /// Create a connected client instance.
    fn connect(creds: &Self::Credentials) -> impl Future<Output = Result<Self, Error>> + Send;
}
