//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with Vultr Object Storage, AWS S3, MinIO, and any S3-compatible service.

use std::fmt;

use derive_more::Deref;
use object_store::RetryConfig;
use object_store::aws::AmazonS3Builder;
use serde::{Deserialize, Serialize};

use super::public_url::virtual_hosted;
use super::{Client, UrlGenerator};
use crate::TRACING_TARGET;
use crate::client::ObjectStoreClient;
use crate::disk::StorageDisk;
use crate::types::Error;

/// Connection settings for one S3-compatible disk.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct S3Config {
    /// Bucket name.
    pub bucket: String,
    /// Signing region (defaults to `us-east-1`).
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL, required for non-AWS services
    /// (e.g. `https://ewr1.vultrobjects.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Access key id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Secret access key.
    #[serde(default, skip_serializing)]
    pub secret: Option<String>,
    /// Public base URL for generated object links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Address the bucket as a path segment instead of a host prefix.
    #[serde(default)]
    pub use_path_style_endpoint: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl S3Config {
    /// Creates a configuration for `bucket` in `region`.
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            key: None,
            secret: None,
            url: None,
            use_path_style_endpoint: false,
        }
    }

    /// Sets the custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the static access credentials.
    pub fn with_credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self.secret = Some(secret.into());
        self
    }

    /// Sets the public base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("key", &self.key)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("url", &self.url)
            .field("use_path_style_endpoint", &self.use_path_style_endpoint)
            .finish()
    }
}

/// S3-backed storage disk.
#[derive(Debug, Deref)]
pub struct S3Provider(StorageDisk);

impl S3Provider {
    /// Unwraps the connected disk.
    pub fn into_disk(self) -> StorageDisk {
        self.0
    }
}

impl Client for S3Provider {
    type Credentials = S3Config;

    const ID: &str = "s3";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        if creds.bucket.is_empty() {
            return Err(Error::configuration("bucket name is empty", Self::ID));
        }

        // Each request is attempted once; a failed check fails the run.
        let retry = RetryConfig {
            max_retries: 0,
            ..Default::default()
        };

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&creds.bucket)
            .with_region(&creds.region)
            .with_retry(retry);

        if let Some(endpoint) = creds.endpoint.as_deref().filter(|e| !e.is_empty()) {
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
            if creds.use_path_style_endpoint {
                builder = builder.with_endpoint(endpoint);
            } else {
                let hosted = virtual_hosted(endpoint, &creds.bucket)?;
                builder = builder
                    .with_endpoint(hosted.as_str().trim_end_matches('/'))
                    .with_virtual_hosted_style_request(true);
            }
        }

        if let Some(key) = &creds.key {
            builder = builder.with_access_key_id(key);
        }

        if let Some(secret) = &creds.secret {
            builder = builder.with_secret_access_key(secret);
        }

        let store = builder
            .build()
            .map_err(|e| Error::configuration(&e, Self::ID).with_source(e))?;
        let urls = UrlGenerator::from_config(creds)?;

        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %creds.bucket,
            region = %creds.region,
            endpoint = ?creds.endpoint,
            url_base = %urls.base(),
            "s3 disk connected"
        );

        let disk = StorageDisk::new(&creds.bucket, ObjectStoreClient::new(store), urls);
        Ok(Self(disk))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::disk::Disk;
    use crate::types::ErrorKind;

    /// Local HTTP server answering every request with one canned S3 response.
    struct StubS3 {
        endpoint: String,
        requests: Arc<AtomicUsize>,
    }

    impl StubS3 {
        async fn start(status: &'static str, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let endpoint = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&requests);

            tokio::spawn(async move {
                while let Ok((mut socket, _)) = listener.accept().await {
                    counter.fetch_add(1, Ordering::SeqCst);

                    let mut head = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => head.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let response = format!(
                        "HTTP/1.1 {status}\r\n\
                         Content-Type: application/xml\r\n\
                         Content-Length: {}\r\n\
                         Connection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
            });

            Self { endpoint, requests }
        }

        async fn disk(&self) -> S3Provider {
            let mut cfg = S3Config::new("probe-bucket", "us-east-1")
                .with_endpoint(&self.endpoint)
                .with_credentials("AKIAEXAMPLE", "secret");
            cfg.use_path_style_endpoint = true;
            S3Provider::connect(&cfg).await.unwrap()
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    const NO_SUCH_BUCKET: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <Error><Code>NoSuchBucket</Code>\
        <Message>The specified bucket does not exist</Message>\
        <BucketName>probe-bucket</BucketName></Error>";

    const ACCESS_DENIED: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>";

    const SLOW_DOWN: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <Error><Code>SlowDown</Code><Message>Please reduce your request rate.</Message></Error>";

    #[tokio::test]
    async fn no_such_bucket_reports_missing_bucket() {
        let server = StubS3::start("404 Not Found", NO_SUCH_BUCKET).await;
        let disk = server.disk().await;

        assert!(!disk.bucket_exists().await.unwrap());
    }

    #[tokio::test]
    async fn access_denied_listing_is_a_service_error() {
        let server = StubS3::start("403 Forbidden", ACCESS_DENIED).await;
        let disk = server.disk().await;

        let err = disk.bucket_exists().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.code(), Some("AccessDenied"));
        assert_eq!(err.status(), Some(403));
        assert!(!err.is_missing_bucket());
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = StubS3::start("503 Service Unavailable", SLOW_DOWN).await;
        let disk = server.disk().await;

        let err = disk.bucket_exists().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(server.requests(), 1);
    }

    #[test]
    fn deserializes_disk_settings() {
        let cfg: S3Config = serde_json::from_str(
            r#"{
                "bucket": "probe-bucket",
                "region": "ewr1",
                "endpoint": "https://ewr1.vultrobjects.com",
                "key": "AKIAEXAMPLE",
                "secret": "shh"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.bucket, "probe-bucket");
        assert_eq!(cfg.secret.as_deref(), Some("shh"));
        assert!(!cfg.use_path_style_endpoint);
    }

    #[test]
    fn region_defaults_to_us_east_1() {
        let cfg: S3Config = serde_json::from_str(r#"{ "bucket": "b" }"#).unwrap();
        assert_eq!(cfg.region, "us-east-1");
    }

    #[test]
    fn secret_is_never_serialized_or_debugged() {
        let cfg = S3Config::new("b", "ewr1").with_credentials("AKIAEXAMPLE", "top-secret");
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("top-secret"));
        assert!(!format!("{cfg:?}").contains("top-secret"));
    }

    #[tokio::test]
    async fn connect_builds_disk_without_network() {
        let cfg = S3Config::new("probe-bucket", "ewr1")
            .with_endpoint("https://ewr1.vultrobjects.com")
            .with_credentials("AKIAEXAMPLE", "secret");
        let provider = S3Provider::connect(&cfg).await.unwrap();
        assert_eq!(provider.bucket(), "probe-bucket");
        assert_eq!(
            provider.url("a.txt").unwrap(),
            "https://probe-bucket.ewr1.vultrobjects.com/a.txt"
        );
    }

    #[tokio::test]
    async fn connect_rejects_empty_bucket() {
        let cfg = S3Config::new("", "ewr1");
        let err = S3Provider::connect(&cfg).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
