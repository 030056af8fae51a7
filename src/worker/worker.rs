//! The download worker: one task per byte range.

use super::chunks::ChunkReader;
use super::outcome::{Outcome, WorkerState};
use super::output::OutputFile;
use crate::error::{Error, Result};
use crate::plan::ByteRange;
use crate::progress::{ProgressHandle, ProgressSnapshot, ProgressTracker};
use crate::utils::parse_content_range;

use reqwest::{
    header::{CONTENT_RANGE, RANGE},
    Response, StatusCode, Url,
};
use reqwest_middleware::ClientWithMiddleware;
use std::io;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, warn, Instrument};

/// Per-worker settings shared by every worker of a download.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    /// Size of each read/write chunk in bytes.
    pub chunk_size: usize,
    /// Bound on the request and on every body read.
    pub timeout: Duration,
    /// Cancel the shared token when this worker fails.
    pub fail_fast: bool,
}

/// Downloads one byte range into the shared output file.
///
/// A worker is created bound to its range and to the download's cancellation
/// token. [`Worker::begin`] hands it the output file and launches it on the
/// tokio runtime; its terminal [`Outcome`] is recorded exactly once.
#[derive(Debug)]
pub struct Worker {
    index: usize,
    range: ByteRange,
    options: WorkerOptions,
    cancel: CancellationToken,
    tracker: Arc<ProgressTracker>,
    outcome: Arc<OnceLock<Outcome>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Creates a worker for `range`, the `index`-th range of the plan.
    pub fn new(
        index: usize,
        range: ByteRange,
        options: WorkerOptions,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            index,
            range,
            options,
            cancel,
            tracker: Arc::new(ProgressTracker::for_range(range)),
            outcome: Arc::new(OnceLock::new()),
            handle: None,
        }
    }

    /// Position of this worker's range in the plan.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The byte range owned by this worker.
    pub fn range(&self) -> ByteRange {
        self.range
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        match self.outcome.get() {
            Some(outcome) => outcome.into(),
            None if self.handle.is_some() => WorkerState::Running,
            None => WorkerState::Created,
        }
    }

    /// Terminal outcome, once reached.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome.get().cloned()
    }

    /// Current progress of the range.
    pub fn progress(&self) -> ProgressSnapshot {
        self.tracker.snapshot()
    }

    /// Read-only handle to this worker's tracker.
    pub fn progress_handle(&self) -> ProgressHandle {
        ProgressHandle::new(&self.tracker)
    }

    /// Launch the worker, writing into `file`.
    ///
    /// Must be called from within a tokio runtime. Returns immediately.
    ///
    /// # Errors
    ///
    /// [`Error::Internal`] if the worker was already launched.
    pub fn begin(&mut self, client: ClientWithMiddleware, url: Url, file: OutputFile) -> Result<()> {
        if self.handle.is_some() || self.outcome.get().is_some() {
            return Err(Error::Internal(format!(
                "worker {} was already started",
                self.index
            )));
        }

        let task = RangeFetch {
            range: self.range,
            options: self.options,
            cancel: self.cancel.clone(),
            tracker: Arc::clone(&self.tracker),
            client,
            url,
            file,
        };
        let outcome = Arc::clone(&self.outcome);
        let span = debug_span!("worker", index = self.index, range = %self.range);

        self.handle = Some(tokio::spawn(
            async move {
                let result = match task.run().await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!("Range {} failed: {}", task.range, e);
                        if task.options.fail_fast {
                            task.cancel.cancel();
                        }
                        Outcome::Failed(Arc::new(e))
                    }
                };
                debug!("Worker finished: {}", result);
                let _ = outcome.set(result);
            }
            .instrument(span),
        ));

        Ok(())
    }

    /// Wait for the worker to reach its terminal state.
    ///
    /// A worker that was never launched is left in `Created`. A panicked
    /// task is recorded as failed.
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                let _ = self.outcome.set(Outcome::Failed(Arc::new(Error::Internal(
                    format!("worker {} task did not complete: {}", self.index, e),
                ))));
            }
        }
    }

    /// Abort the worker's task without waiting for it.
    ///
    /// The task is dropped at its next await point, releasing its tracker
    /// and its handle on the output file. The outcome is left unset.
    pub(crate) fn abort(&self) {
        if let Some(ref handle) = self.handle {
            handle.abort();
        }
    }
}

/// State moved into the spawned task.
struct RangeFetch {
    range: ByteRange,
    options: WorkerOptions,
    cancel: CancellationToken,
    tracker: Arc<ProgressTracker>,
    client: ClientWithMiddleware,
    url: Url,
    file: OutputFile,
}

impl RangeFetch {
    async fn run(&self) -> Result<Outcome> {
        let range = self.range;
        debug!("Fetching {} with Range: {}", self.url, range.header_value());

        let request = self
            .client
            .get(self.url.clone())
            .header(RANGE, range.header_value())
            .send();

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Ok(self.cancelled()),
            res = tokio::time::timeout(self.options.timeout, request) => res,
        };
        let response = response
            .map_err(|_| Error::network(range, timed_out("range request timed out")))?
            .map_err(|e| Error::network(range, e))?;

        check_partial_content(&response, range)?;

        let mut chunks = ChunkReader::new(
            Box::pin(response.bytes_stream()),
            self.options.chunk_size,
            self.options.timeout,
        );
        let mut offset = range.start();

        loop {
            // Dropping the response on cancellation closes the connection.
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(self.cancelled()),
                next = chunks.next_chunk() => next,
            };
            let chunk = match next.map_err(|e| Error::network(range, e))? {
                Some(chunk) => chunk,
                None => break,
            };

            if self.cancel.is_cancelled() {
                return Ok(self.cancelled());
            }

            let len = chunk.len() as u64;
            if len > range.end() - offset {
                return Err(Error::RangeMismatch {
                    range,
                    status: StatusCode::PARTIAL_CONTENT,
                    reason: format!("server sent more than the {} requested bytes", range.len()),
                });
            }

            self.file.write_at(offset, chunk).await?;
            offset += len;
            self.tracker.update(offset)?;
        }

        if offset < range.end() {
            return Err(Error::network(
                range,
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "connection closed after {} of {} bytes",
                        offset - range.start(),
                        range.len()
                    ),
                ),
            ));
        }

        Ok(Outcome::Succeeded)
    }

    fn cancelled(&self) -> Outcome {
        debug!(
            "Cancelled after {} bytes",
            self.tracker.current() - self.range.start()
        );
        Outcome::Cancelled
    }
}

/// Require a `206 Partial Content` answer for exactly `range`.
fn check_partial_content(response: &Response, range: ByteRange) -> Result<()> {
    let status = response.status();

    if let Err(e) = response.error_for_status_ref() {
        return Err(Error::network(range, e));
    }

    if status != StatusCode::PARTIAL_CONTENT {
        return Err(Error::RangeMismatch {
            range,
            status,
            reason: format!("expected 206 Partial Content, got {}", status),
        });
    }

    match response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) => match parse_content_range(value) {
            Some(cr) if cr.first == range.start() && cr.last == range.last() => Ok(()),
            _ => Err(Error::RangeMismatch {
                range,
                status,
                reason: format!("unexpected Content-Range \"{}\"", value),
            }),
        },
        None => {
            debug!("No Content-Range in partial response for {}", range);
            Ok(())
        }
    }
}

fn timed_out(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, msg)
}
