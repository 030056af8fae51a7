//! Download summary functionality.
//!
//! This module contains the [`Summary`] struct and [`Status`] enum describing
//! the state of a ranged download: one entry per worker plus the overall
//! status derived from them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use splitfetch::{DownloaderBuilder, Status};
//!
//! # async fn example() -> Result<(), splitfetch::Error> {
//! let downloader = DownloaderBuilder::new().build();
//! let summary = downloader.download("https://example.com/file.zip", None).await?;
//!
//! match summary.status() {
//!     Status::Complete => println!("Wrote {} bytes", summary.bytes_written()),
//!     Status::Failed { failed } => println!("{} ranges failed", failed.len()),
//!     Status::Cancelled => println!("Cancelled"),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

use crate::plan::ByteRange;
use crate::resource::ResourceDescriptor;
use crate::worker::{Outcome, WorkerState};

use std::path::{Path, PathBuf};

/// Overall status of a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// No worker has been launched yet.
    NotStarted,
    /// At least one worker has not reached a terminal state.
    InProgress,
    /// Every worker succeeded; the file is byte-complete.
    Complete,
    /// At least one worker failed. Lists the failed ranges; ranges of
    /// workers cancelled alongside them are visible via [`Summary::workers`].
    Failed {
        /// Ranges whose worker failed.
        failed: Vec<ByteRange>,
    },
    /// Cancellation was requested and the download did not complete.
    Cancelled,
}

impl Status {
    /// Derive the overall status from the per-worker states.
    ///
    /// Success of every worker wins over a late cancellation request; any
    /// failure wins over cancellation.
    pub fn derive(workers: &[WorkerSummary]) -> Self {
        if workers.iter().all(|w| w.state == WorkerState::Created) {
            return Status::NotStarted;
        }
        if workers.iter().any(|w| !w.state.is_terminal()) {
            return Status::InProgress;
        }
        if workers.iter().all(|w| w.state == WorkerState::Succeeded) {
            return Status::Complete;
        }

        let failed: Vec<ByteRange> = workers
            .iter()
            .filter(|w| w.state == WorkerState::Failed)
            .map(|w| w.range)
            .collect();
        if failed.is_empty() {
            Status::Cancelled
        } else {
            Status::Failed { failed }
        }
    }

    /// Whether the download can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Complete | Status::Failed { .. } | Status::Cancelled
        )
    }
}

/// State of one worker at the time a [`Summary`] was taken.
#[derive(Debug, Clone)]
pub struct WorkerSummary {
    /// Position of the range in the plan.
    pub index: usize,
    /// The worker's byte range.
    pub range: ByteRange,
    /// Lifecycle state.
    pub state: WorkerState,
    /// Terminal outcome, if reached.
    pub outcome: Option<Outcome>,
    /// Bytes of the range written to the output file.
    pub written: u64,
}

/// Represents the state of a ranged download.
#[derive(Debug, Clone)]
pub struct Summary {
    resource: ResourceDescriptor,
    target: PathBuf,
    workers: Vec<WorkerSummary>,
    status: Status,
}

impl Summary {
    /// Create a new [`Summary`], deriving the status from `workers`.
    pub fn new(resource: ResourceDescriptor, target: PathBuf, workers: Vec<WorkerSummary>) -> Self {
        let status = Status::derive(&workers);
        Self {
            resource,
            target,
            workers,
            status,
        }
    }

    /// Get a reference to the summary's status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The downloaded resource.
    pub fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    /// Path of the output file.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Per-worker details, in plan order.
    pub fn workers(&self) -> &[WorkerSummary] {
        &self.workers
    }

    /// Ranges whose worker failed.
    pub fn failed_ranges(&self) -> Vec<ByteRange> {
        match &self.status {
            Status::Failed { failed } => failed.clone(),
            _ => Vec::new(),
        }
    }

    /// Whether every range was written.
    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    /// Total bytes written across all ranges.
    pub fn bytes_written(&self) -> u64 {
        self.workers.iter().map(|w| w.written).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use reqwest::Url;
    use std::sync::Arc;

    fn worker(index: usize, state: WorkerState) -> WorkerSummary {
        let range = ByteRange::new(index as u64 * 10, index as u64 * 10 + 10).unwrap();
        let outcome = match state {
            WorkerState::Succeeded => Some(Outcome::Succeeded),
            WorkerState::Cancelled => Some(Outcome::Cancelled),
            WorkerState::Failed => Some(Outcome::Failed(Arc::new(Error::Internal("x".into())))),
            _ => None,
        };
        let written = if state == WorkerState::Succeeded { 10 } else { 0 };
        WorkerSummary {
            index,
            range,
            state,
            outcome,
            written,
        }
    }

    fn summary(states: &[WorkerState]) -> Summary {
        let url = Url::parse("http://example.com/test.zip").unwrap();
        let resource = ResourceDescriptor::new(url, states.len() as u64 * 10, "application/zip", true);
        let workers = states
            .iter()
            .enumerate()
            .map(|(i, s)| worker(i, *s))
            .collect();
        Summary::new(resource, PathBuf::from("test.zip"), workers)
    }

    #[test]
    fn test_not_started() {
        let s = summary(&[WorkerState::Created, WorkerState::Created]);
        assert_eq!(s.status(), &Status::NotStarted);
        assert!(!s.status().is_terminal());
    }

    #[test]
    fn test_in_progress() {
        let s = summary(&[WorkerState::Succeeded, WorkerState::Running]);
        assert_eq!(s.status(), &Status::InProgress);
    }

    #[test]
    fn test_complete() {
        let s = summary(&[WorkerState::Succeeded, WorkerState::Succeeded]);
        assert!(s.is_complete());
        assert_eq!(s.bytes_written(), 20);
        assert!(s.failed_ranges().is_empty());
    }

    #[test]
    fn test_partial_failure_lists_failed_ranges() {
        let s = summary(&[
            WorkerState::Succeeded,
            WorkerState::Failed,
            WorkerState::Cancelled,
        ]);
        assert_eq!(
            s.failed_ranges(),
            vec![ByteRange::new(10, 20).unwrap()]
        );
        assert!(s.status().is_terminal());
        assert_eq!(s.bytes_written(), 10);
    }

    #[test]
    fn test_cancelled() {
        let s = summary(&[WorkerState::Succeeded, WorkerState::Cancelled]);
        assert_eq!(s.status(), &Status::Cancelled);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_summary_accessors() {
        let s = summary(&[WorkerState::Succeeded]);
        assert_eq!(s.target(), Path::new("test.zip"));
        assert_eq!(s.resource().total_size(), 10);
        assert_eq!(s.workers().len(), 1);
        assert!(s.workers()[0].outcome.as_ref().unwrap().is_success());
    }
}
