//! State of one ranged download.
//!
//! A [`Download`] is produced by [`Downloader::prepare`](crate::Downloader::prepare)
//! once the resource has been probed and the range plan computed. It owns the
//! workers, the cancellation token they share and the resolved target path.
//!
//! # Examples
//!
//! ```rust,no_run
//! use splitfetch::DownloaderBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), splitfetch::Error> {
//! let downloader = DownloaderBuilder::new().workers(4).build();
//! let mut download = downloader
//!     .prepare("https://example.com/file.zip", Some("file.zip".into()))
//!     .await?;
//!
//! download.start().await?;
//! while !download.is_done() {
//!     println!("{:.1}%", download.overall_fraction() * 100.0);
//!     tokio::time::sleep(Duration::from_millis(200)).await;
//! #   break;
//! }
//! let summary = download.join().await;
//! println!("{:?}", summary.status());
//! # Ok(())
//! # }
//! ```

use super::summary::{Summary, WorkerSummary};
use crate::downloader::CompletionCallback;
use crate::error::{Error, Result};
use crate::plan::ByteRange;
use crate::progress::{overall_fraction, ProgressHandle, ProgressSnapshot};
use crate::resource::ResourceDescriptor;
use crate::worker::{OutputFile, Worker, WorkerState};

use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A prepared download: resource, range plan and one worker per range.
///
/// Dropping a started download cancels it and aborts its workers, so neither
/// the trackers nor the writes outlive it.
pub struct Download {
    resource: ResourceDescriptor,
    ranges: Vec<ByteRange>,
    workers: Vec<Worker>,
    cancel: CancellationToken,
    target: PathBuf,
    client: ClientWithMiddleware,
    file: Option<OutputFile>,
    on_complete: Option<Arc<CompletionCallback>>,
    reported: bool,
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("resource", &self.resource)
            .field("ranges", &self.ranges)
            .field("workers", &self.workers)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("target", &self.target)
            .field("started", &self.file.is_some())
            .finish()
    }
}

impl Drop for Download {
    fn drop(&mut self) {
        if self
            .workers
            .iter()
            .any(|w| w.state() == WorkerState::Running)
        {
            debug!("Download of {} dropped with running workers", self.resource.url());
        }
        self.cancel.cancel();
        for worker in &self.workers {
            worker.abort();
        }
    }
}

impl Download {
    pub(crate) fn new(
        resource: ResourceDescriptor,
        workers: Vec<Worker>,
        cancel: CancellationToken,
        target: PathBuf,
        client: ClientWithMiddleware,
        on_complete: Option<Arc<CompletionCallback>>,
    ) -> Self {
        let ranges = workers.iter().map(Worker::range).collect();
        Self {
            resource,
            ranges,
            workers,
            cancel,
            target,
            client,
            file: None,
            on_complete,
            reported: false,
        }
    }

    /// The probed resource.
    pub fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    /// The range plan, in ascending order.
    pub fn ranges(&self) -> &[ByteRange] {
        &self.ranges
    }

    /// The workers, one per range, in plan order.
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Path the download is written to.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Whether [`Download::start`] has been called.
    pub fn is_started(&self) -> bool {
        self.file.is_some()
    }

    /// Create or truncate the target file and launch every worker.
    ///
    /// Returns as soon as the workers are running; use [`Download::join`] to
    /// wait for them. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// I/O errors creating the file, or [`Error::Internal`] if the download
    /// was already started.
    pub async fn start(&mut self) -> Result<()> {
        if self.file.is_some() {
            return Err(Error::Internal("download was already started".into()));
        }

        let file = OutputFile::create(&self.target).await?;
        info!(
            "Downloading {} ({} bytes) into {:?} with {} workers",
            self.resource.url(),
            self.resource.total_size(),
            self.target,
            self.workers.len()
        );

        for worker in &mut self.workers {
            worker.begin(
                self.client.clone(),
                self.resource.url().clone(),
                file.clone(),
            )?;
        }
        self.file = Some(file);

        Ok(())
    }

    /// Request cooperative cancellation of every worker. Idempotent.
    ///
    /// Workers stop at their next chunk boundary, or as soon as a pending
    /// network read is woken, and never write another chunk.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            info!("Cancelling download of {}", self.resource.url());
            self.cancel.cancel();
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the shared cancellation token, for cancelling from another
    /// task (e.g. a Ctrl-C handler) while [`Download::join`] is pending.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Per-worker outcomes and the overall status. Never blocks.
    pub fn outcome(&self) -> Summary {
        let workers = self
            .workers
            .iter()
            .map(|w| WorkerSummary {
                index: w.index(),
                range: w.range(),
                state: w.state(),
                outcome: w.outcome(),
                written: w.progress().written(),
            })
            .collect();
        Summary::new(self.resource.clone(), self.target.clone(), workers)
    }

    /// Progress of every range, indexed like [`Download::ranges`].
    pub fn progress(&self) -> Vec<ProgressSnapshot> {
        self.workers.iter().map(Worker::progress).collect()
    }

    /// Read-only tracker handles that do not outlive this download.
    pub fn progress_handles(&self) -> Vec<ProgressHandle> {
        self.workers.iter().map(Worker::progress_handle).collect()
    }

    /// Completion across all ranges, weighted by range length.
    pub fn overall_fraction(&self) -> f64 {
        overall_fraction(&self.progress())
    }

    /// Whether every range has been written.
    pub fn is_done(&self) -> bool {
        self.progress().iter().all(|p| p.done)
    }

    /// Wait for every launched worker to reach a terminal state and return
    /// the final summary.
    ///
    /// The completion callback, if any, runs once on the first join that
    /// observes a terminal status.
    pub async fn join(&mut self) -> Summary {
        for worker in &mut self.workers {
            worker.join().await;
        }

        if let Some(ref file) = self.file {
            if let Err(e) = file.sync().await {
                warn!("Failed to flush {:?}: {}", file.path(), e);
            }
        }

        let summary = self.outcome();
        debug!("Download of {} finished: {:?}", self.resource.url(), summary.status());

        if summary.status().is_terminal() && !self.reported {
            self.reported = true;
            info!(
                "{} bytes written to {:?}",
                summary.bytes_written(),
                self.target
            );
            if let Some(ref callback) = self.on_complete {
                callback(&summary);
            }
        }

        summary
    }
}
