//! Named disk configuration.
//!
//! Disks are read from a JSON file:
//!
//! ```json
//! {
//!   "disks": {
//!     "vultr": {
//!       "driver": "s3",
//!       "key": "AKIA...",
//!       "secret": "...",
//!       "region": "ewr1",
//!       "bucket": "my-bucket",
//!       "endpoint": "https://ewr1.vultrobjects.com"
//!     }
//!   }
//! }
//! ```
//!
//! Without a file, a single `vultr` disk is assembled from `VULTR_*`
//! environment variables.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use s3probe_object::providers::S3Config;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Disk name used when `--disk` is not given.
pub const DEFAULT_DISK: &str = "vultr";

/// Default Vultr Object Storage region.
const DEFAULT_VULTR_REGION: &str = "ewr1";

/// Storage drivers this tool can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Driver {
    /// Any S3-compatible object storage.
    S3,
}

/// One named disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Driver name as written in the configuration.
    pub driver: String,
    /// Connection settings.
    #[serde(flatten)]
    pub s3: S3Config,
}

impl DiskConfig {
    /// Parses the configured driver.
    pub fn driver(&self) -> anyhow::Result<Driver> {
        Driver::from_str(&self.driver)
            .map_err(|_| anyhow!("driver [{}] is not supported", self.driver))
    }
}

/// All configured disks, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemsConfig {
    /// Disks by name.
    #[serde(default)]
    pub disks: BTreeMap<String, DiskConfig>,
}

impl FilesystemsConfig {
    /// Loads disks from `path`, or from the environment when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Reads a JSON disk file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read disk configuration {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid disk configuration {}", path.display()))?;

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            path = %path.display(),
            disks = ?config.disks.keys().collect::<Vec<_>>(),
            "Loaded disk configuration"
        );

        Ok(config)
    }

    /// Builds the `vultr` disk from process environment variables.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Builds the `vultr` disk from `lookup`.
    ///
    /// | Variable                        | Field                     |
    /// |---------------------------------|---------------------------|
    /// | `VULTR_ACCESS_KEY_ID`           | key                       |
    /// | `VULTR_SECRET_ACCESS_KEY`       | secret                    |
    /// | `VULTR_DEFAULT_REGION`          | region (`ewr1`)           |
    /// | `VULTR_BUCKET`                  | bucket                    |
    /// | `VULTR_ENDPOINT`                | endpoint (from region)    |
    /// | `VULTR_URL`                     | url                       |
    /// | `VULTR_USE_PATH_STYLE_ENDPOINT` | use_path_style_endpoint   |
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let region = var("VULTR_DEFAULT_REGION").unwrap_or_else(|| DEFAULT_VULTR_REGION.into());
        let endpoint =
            var("VULTR_ENDPOINT").unwrap_or_else(|| format!("https://{region}.vultrobjects.com"));

        let mut s3 = S3Config::new(var("VULTR_BUCKET").unwrap_or_default(), region)
            .with_endpoint(endpoint);
        s3.key = var("VULTR_ACCESS_KEY_ID");
        s3.secret = var("VULTR_SECRET_ACCESS_KEY");
        s3.url = var("VULTR_URL");
        s3.use_path_style_endpoint = var("VULTR_USE_PATH_STYLE_ENDPOINT")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"));

        let disk = DiskConfig {
            driver: Driver::S3.to_string(),
            s3,
        };

        Self {
            disks: BTreeMap::from([(DEFAULT_DISK.to_string(), disk)]),
        }
    }

    /// Looks up a disk by name.
    ///
    /// # Errors
    ///
    /// Returns an error naming the disk if it is not configured.
    pub fn disk(&self, name: &str) -> anyhow::Result<&DiskConfig> {
        self.disks
            .get(name)
            .ok_or_else(|| anyhow!("disk [{name}] does not have a configured driver"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn loads_named_disks_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "disks": {{
                    "vultr": {{
                        "driver": "s3",
                        "key": "AKIAEXAMPLEKEY",
                        "secret": "secret",
                        "region": "ams1",
                        "bucket": "assets",
                        "endpoint": "https://ams1.vultrobjects.com"
                    }},
                    "backup": {{ "driver": "s3", "bucket": "backups" }}
                }}
            }}"#
        )
        .unwrap();

        let config = FilesystemsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.disks.len(), 2);

        let vultr = config.disk("vultr").unwrap();
        assert_eq!(vultr.driver().unwrap(), Driver::S3);
        assert_eq!(vultr.s3.bucket, "assets");
        assert_eq!(vultr.s3.region, "ams1");
        assert_eq!(vultr.s3.key.as_deref(), Some("AKIAEXAMPLEKEY"));

        let backup = config.disk("backup").unwrap();
        assert_eq!(backup.s3.region, "us-east-1");
        assert!(backup.s3.endpoint.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FilesystemsConfig::load(Some(dir.path().join("absent.json").as_path())).unwrap_err();
        assert!(err.to_string().contains("failed to read disk configuration"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = FilesystemsConfig::from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid disk configuration"));
    }

    #[test]
    fn unknown_disk_is_reported_by_name() {
        let config = FilesystemsConfig::default();
        let err = config.disk("archive").unwrap_err();
        assert_eq!(
            err.to_string(),
            "disk [archive] does not have a configured driver"
        );
    }

    #[test]
    fn unsupported_driver_is_rejected() {
        let disk = DiskConfig {
            driver: "ftp".into(),
            s3: S3Config::new("b", "ewr1"),
        };
        let err = disk.driver().unwrap_err();
        assert_eq!(err.to_string(), "driver [ftp] is not supported");
    }

    #[test]
    fn driver_parsing_ignores_case() {
        let disk = DiskConfig {
            driver: "S3".into(),
            s3: S3Config::new("b", "ewr1"),
        };
        assert_eq!(disk.driver().unwrap(), Driver::S3);
    }

    #[test]
    fn env_defaults_target_vultr() {
        let config = FilesystemsConfig::from_env_with(env(&[
            ("VULTR_ACCESS_KEY_ID", "AKIAEXAMPLE"),
            ("VULTR_SECRET_ACCESS_KEY", "secret"),
            ("VULTR_BUCKET", "assets"),
        ]));

        let disk = config.disk(DEFAULT_DISK).unwrap();
        assert_eq!(disk.driver, "s3");
        assert_eq!(disk.s3.region, "ewr1");
        assert_eq!(
            disk.s3.endpoint.as_deref(),
            Some("https://ewr1.vultrobjects.com")
        );
        assert_eq!(disk.s3.bucket, "assets");
        assert!(!disk.s3.use_path_style_endpoint);
    }

    #[test]
    fn env_overrides_region_and_endpoint() {
        let config = FilesystemsConfig::from_env_with(env(&[
            ("VULTR_DEFAULT_REGION", "sjc1"),
            ("VULTR_ENDPOINT", "http://localhost:9000"),
            ("VULTR_USE_PATH_STYLE_ENDPOINT", "true"),
            ("VULTR_URL", " "),
        ]));

        let disk = config.disk(DEFAULT_DISK).unwrap();
        assert_eq!(disk.s3.region, "sjc1");
        assert_eq!(disk.s3.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(disk.s3.use_path_style_endpoint);
        assert!(disk.s3.url.is_none());
        assert!(disk.s3.key.is_none());
    }
}
