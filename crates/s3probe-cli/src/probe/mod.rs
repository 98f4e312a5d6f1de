//! Storage connectivity probe.
//!
//! Runs seven checks against one disk, strictly in order, stopping at the
//! first failure:
//!
//! ```text
//! bucket access -> write -> read -> url -> exists -> metadata -> delete
//! ```
//!
//! Once the test object has been written, any later failure triggers a single
//! best-effort delete so the object does not outlive the run.

mod artifact;
mod error;
mod step;

use std::io::Write;

pub use artifact::TestArtifact;
pub use error::{ProbeError, ProbeResult};
use jiff::Timestamp;
use s3probe_object::disk::Disk;
use s3probe_object::providers::{Client, S3Provider};
pub use step::Step;

use crate::TRACING_TARGET_PROBE;
use crate::config::{Cli, DiskConfig, Driver, FilesystemsConfig};
use crate::report::{self, Console};

/// Indentation of per-step result lines.
const INDENT: &str = "   ";

/// What a successful run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Key of the test object.
    pub key: String,
    /// Public URL resolved for the test object.
    pub url: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Last-modified time reported by the service.
    pub last_modified: Timestamp,
}

/// Resolves the disk named on the command line and probes it.
///
/// Prints progress to `console`; the caller prints the final outcome.
pub async fn run<W: Write>(cli: &Cli, console: &mut Console<W>) -> ProbeResult<ProbeReport> {
    console.info(format!("🔍 Checking object storage connection for disk '{}'...", cli.disk))?;
    console.new_line()?;

    let filesystems = FilesystemsConfig::load(cli.config.as_deref())?;
    let disk_config = filesystems.disk(&cli.disk)?;

    if cli.verbose {
        report::display_configuration(console, &cli.disk, disk_config)?;
    }

    let disk = connect(disk_config).await?;
    StorageConnectivityProbe::new(disk.as_ref(), console)
        .run(&TestArtifact::now())
        .await
}

/// Builds a disk client for `config`.
async fn connect(config: &DiskConfig) -> ProbeResult<Box<dyn Disk>> {
    match config.driver()? {
        Driver::S3 => {
            let provider = S3Provider::connect(&config.s3).await?;
            Ok(Box::new(provider.into_disk()))
        }
    }
}

/// Runs the ordered checks against one [`Disk`].
pub struct StorageConnectivityProbe<'a, W> {
    disk: &'a dyn Disk,
    console: &'a mut Console<W>,
}

impl<'a, W: Write> StorageConnectivityProbe<'a, W> {
    /// Creates a probe over `disk`, reporting to `console`.
    pub fn new(disk: &'a dyn Disk, console: &'a mut Console<W>) -> Self {
        Self { disk, console }
    }

    /// Runs all seven checks using `artifact` as the test object.
    pub async fn run(mut self, artifact: &TestArtifact) -> ProbeResult<ProbeReport> {
        tracing::info!(
            target: TRACING_TARGET_PROBE,
            bucket = %self.disk.bucket(),
            key = %artifact.key,
            "Starting connectivity probe"
        );

        self.check_bucket().await?;
        self.write(artifact).await?;

        match self.verify(artifact).await {
            Ok(report) => {
                tracing::info!(
                    target: TRACING_TARGET_PROBE,
                    key = %report.key,
                    "Connectivity probe passed"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_PROBE,
                    key = %artifact.key,
                    error = %err,
                    "Connectivity probe failed after write"
                );
                self.cleanup(&artifact.key).await;
                Err(err)
            }
        }
    }

    /// Steps 3 through 7, run once the test object exists.
    async fn verify(&mut self, artifact: &TestArtifact) -> ProbeResult<ProbeReport> {
        self.read(artifact).await?;
        let url = self.url(&artifact.key)?;
        self.exists(&artifact.key).await?;
        let (size, last_modified) = self.metadata(&artifact.key).await?;
        self.delete(&artifact.key).await?;

        Ok(ProbeReport {
            key: artifact.key.clone(),
            url,
            size,
            last_modified,
        })
    }

    async fn check_bucket(&mut self) -> ProbeResult<()> {
        self.begin(Step::BucketAccess)?;
        let bucket = self.disk.bucket().to_string();

        if self.disk.bucket_exists().await? {
            self.pass(format!("Bucket '{bucket}' is accessible"))
        } else {
            self.fail(Step::BucketAccess, format!("Bucket '{bucket}' not found"))
        }
    }

    async fn write(&mut self, artifact: &TestArtifact) -> ProbeResult<()> {
        self.begin(Step::Write)?;
        self.disk
            .put(
                &artifact.key,
                artifact.contents.clone(),
                Some(TestArtifact::CONTENT_TYPE),
            )
            .await?;
        self.pass(format!("File '{}' created successfully", artifact.key))
    }

    async fn read(&mut self, artifact: &TestArtifact) -> ProbeResult<()> {
        self.begin(Step::Read)?;
        let contents = self.disk.get(&artifact.key).await?;

        if contents == artifact.contents {
            self.pass("File read successfully")
        } else {
            tracing::debug!(
                target: TRACING_TARGET_PROBE,
                expected = artifact.contents.len(),
                actual = contents.len(),
                "Read content differs from written content"
            );
            self.fail(Step::Read, "File content does not match")
        }
    }

    fn url(&mut self, key: &str) -> ProbeResult<String> {
        self.begin(Step::Url)?;
        let url = self.disk.url(key)?;
        self.pass(format!("URL: {url}"))?;
        Ok(url)
    }

    async fn exists(&mut self, key: &str) -> ProbeResult<()> {
        self.begin(Step::Exists)?;

        if self.disk.exists(key).await? {
            self.pass("File exists")
        } else {
            self.fail(Step::Exists, "File not found")
        }
    }

    async fn metadata(&mut self, key: &str) -> ProbeResult<(u64, Timestamp)> {
        self.begin(Step::Metadata)?;
        let metadata = self.disk.metadata(key).await?;

        self.pass(format!("Size: {} bytes", metadata.size))?;
        self.pass(format!(
            "Last modified: {}",
            report::format_local(metadata.last_modified)
        ))?;
        Ok((metadata.size, metadata.last_modified))
    }

    async fn delete(&mut self, key: &str) -> ProbeResult<()> {
        self.begin(Step::Delete)?;
        self.disk.delete(key).await?;

        if self.disk.exists(key).await? {
            self.fail(Step::Delete, "Could not delete the file")
        } else {
            self.pass("File deleted successfully")
        }
    }

    /// Best-effort removal of the test object after a failed step.
    async fn cleanup(&mut self, key: &str) {
        let warning = match self.disk.delete(key).await {
            Ok(()) => return,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_PROBE,
                    key = %key,
                    error = %err,
                    "Failed to remove test object"
                );
                format!("{INDENT}⚠️  Test file '{key}' could not be removed: {err}")
            }
        };

        if let Err(err) = self.console.warn(warning) {
            tracing::warn!(target: TRACING_TARGET_PROBE, error = %err, "Console write failed");
        }
    }

    fn begin(&mut self, step: Step) -> ProbeResult<()> {
        tracing::debug!(target: TRACING_TARGET_PROBE, step = %step, "Running check");
        self.console.info(step.heading())?;
        Ok(())
    }

    fn pass(&mut self, message: impl AsRef<str>) -> ProbeResult<()> {
        self.console.line(format!("{INDENT}✅ {}", message.as_ref()))?;
        Ok(())
    }

    fn fail<T>(&mut self, step: Step, message: impl Into<String>) -> ProbeResult<T> {
        let message = message.into();
        self.console.error(format!("{INDENT}❌ {message}"))?;
        Err(ProbeError::check(step, message))
    }
}
