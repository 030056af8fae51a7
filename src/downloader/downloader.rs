//! Core downloader implementation.
//!
//! This module contains the [`Downloader`] struct that probes a resource,
//! plans its byte ranges and builds the workers of a [`Download`].
//!
//! # Examples
//!
//! ## One-shot download
//!
//! ```rust,no_run
//! use splitfetch::downloader::DownloaderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().workers(8).build();
//! let summary = downloader
//!     .download("https://example.com/file.zip", Some("file.zip".into()))
//!     .await?;
//! println!("{:?}: {} bytes", summary.status(), summary.bytes_written());
//! # Ok(())
//! # }
//! ```
//!
//! ## Prepare, start and cancel
//!
//! ```rust,no_run
//! use splitfetch::downloader::DownloaderBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().build();
//! let mut download = downloader.prepare("https://example.com/big.iso", None).await?;
//! let token = download.cancellation_token();
//! tokio::spawn(async move {
//!     tokio::time::sleep(Duration::from_secs(5)).await;
//!     token.cancel();
//! });
//! download.start().await?;
//! let summary = download.join().await;
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use crate::download::{Download, Summary};
use crate::error::{Error, Result};
use crate::http::create_http_client;
use crate::plan::compute_ranges;
use crate::resource::{parse_url, probe, ResourceDescriptor};
use crate::worker::{Worker, WorkerOptions};

use reqwest::header::HeaderMap;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use splitfetch::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Gets the directory used for generated file names.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the number of workers per download.
    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// Gets the read/write chunk size.
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    /// Gets the request and read timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Gets the number of retries per request.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets whether a worker failure cancels the others.
    pub fn fail_fast(&self) -> bool {
        self.config.fail_fast
    }

    /// The client used for requests: the caller's, or a newly built one.
    fn client(&self) -> Result<ClientWithMiddleware> {
        match self.config.client {
            Some(ref client) => Ok(client.clone()),
            None => Ok(create_http_client(self.config.http_client_config())?),
        }
    }

    /// Probe `url`, plan its ranges and create one worker per range.
    ///
    /// `target` defaults to `download_<unix-seconds>.<ext>` in the configured
    /// directory. The output file is not touched until [`Download::start`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] / [`Error::InvalidConfig`] for bad input.
    /// - [`Error::UnsupportedRange`] / [`Error::Metadata`] from the probe.
    /// - [`Error::RangeComputation`] for an empty resource or zero workers.
    pub async fn prepare(&self, url: &str, target: Option<PathBuf>) -> Result<Download> {
        if self.config.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "chunk size must be at least one byte".into(),
            ));
        }

        let url = parse_url(url)?;
        let client = self.client()?;
        let resource = probe(&client, &url, self.config.timeout).await?;
        let ranges = compute_ranges(resource.total_size(), self.config.workers)?;
        let target = self.resolve_target(&resource, target);

        info!("File size: {}", resource.total_size());
        info!("Target file: {:?}", target);

        let cancel = CancellationToken::new();
        let options = WorkerOptions {
            chunk_size: self.config.chunk_size,
            timeout: self.config.timeout,
            fail_fast: self.config.fail_fast,
        };

        let size = resource.total_size();
        let workers: Vec<Worker> = ranges
            .iter()
            .enumerate()
            .map(|(n, range)| {
                debug!(
                    "{}/{} workers created [bytes 0-{} ({}%)]",
                    n + 1,
                    ranges.len(),
                    range.end(),
                    range.end() * 100 / size
                );
                Worker::new(n, *range, options, cancel.clone())
            })
            .collect();

        Ok(Download::new(
            resource,
            workers,
            cancel,
            target,
            client,
            self.config.on_complete.clone(),
        ))
    }

    /// Prepare, start and wait for a download.
    pub async fn download(&self, url: &str, target: Option<PathBuf>) -> Result<Summary> {
        let mut download = self.prepare(url, target).await?;
        download.start().await?;
        Ok(download.join().await)
    }

    fn resolve_target(&self, resource: &ResourceDescriptor, target: Option<PathBuf>) -> PathBuf {
        match target {
            Some(path) => {
                if !has_extension(&path, &resource.extension()) {
                    warn!(
                        "Target {:?} does not match the {} extension of the download",
                        path,
                        resource.extension()
                    );
                }
                path
            }
            None => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                self.config
                    .directory
                    .join(resource.generated_filename(now))
            }
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
