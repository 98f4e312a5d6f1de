//! Public object URLs for S3-compatible buckets.
//!
//! The base URL is resolved once per disk, in this order:
//!
//! ```text
//! url configured                 -> {url}/{key}
//! endpoint + path-style          -> {endpoint}/{bucket}/{key}
//! endpoint                       -> {scheme}://{bucket}.{host}/{key}
//! neither                        -> https://{bucket}.s3.{region}.amazonaws.com/{key}
//! ```

use url::Url;

use super::S3Config;
use crate::types::Error;

const LABEL: &str = "url";

/// Builds public URLs for object keys on one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlGenerator {
    base: Url,
}

impl UrlGenerator {
    /// Creates a generator rooted at `base`. Keys are appended as path segments.
    pub fn new(base: &str) -> Result<Self, Error> {
        let base = Url::parse(base)
            .map_err(|e| Error::configuration(format!("invalid base url '{base}': {e}"), LABEL))?;
        if base.cannot_be_a_base() {
            return Err(Error::configuration(
                format!("url '{base}' cannot hold object paths"),
                LABEL,
            ));
        }
        Ok(Self { base })
    }

    /// Resolves the base URL for the disk described by `config`.
    pub fn from_config(config: &S3Config) -> Result<Self, Error> {
        if let Some(url) = config.url.as_deref().filter(|u| !u.is_empty()) {
            return Self::new(url);
        }

        match config.endpoint.as_deref().filter(|e| !e.is_empty()) {
            Some(endpoint) if config.use_path_style_endpoint => {
                let mut generator = Self::new(endpoint)?;
                generator.push_segment(&config.bucket)?;
                Ok(generator)
            }
            Some(endpoint) => Ok(Self {
                base: virtual_hosted(endpoint, &config.bucket)?,
            }),
            None => Self::new(&format!(
                "https://{}.s3.{}.amazonaws.com",
                config.bucket, config.region
            )),
        }
    }

    /// Returns the base URL keys are appended to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Returns the public URL of `key`.
    pub fn url(&self, key: &str) -> Result<Url, Error> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::configuration(format!("url '{}' cannot hold object paths", self.base), LABEL)
            })?;
            segments
                .pop_if_empty()
                .extend(key.trim_start_matches('/').split('/'));
        }
        Ok(url)
    }

    fn push_segment(&mut self, segment: &str) -> Result<(), Error> {
        self.base = self.url(segment)?;
        Ok(())
    }
}

/// Prefixes the endpoint host with the bucket name.
pub(crate) fn virtual_hosted(endpoint: &str, bucket: &str) -> Result<Url, Error> {
    let mut url = Url::parse(endpoint).map_err(|e| {
        Error::configuration(format!("invalid endpoint '{endpoint}': {e}"), LABEL)
    })?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::configuration(format!("endpoint '{endpoint}' has no host"), LABEL))?
        .to_string();
    url.set_host(Some(&format!("{bucket}.{host}")))
        .map_err(|e| Error::configuration(format!("invalid bucket host '{bucket}': {e}"), LABEL))?;
    Ok(url)
}
