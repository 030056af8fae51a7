//! Fixed-size chunking of a response body.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use std::io;
use std::time::Duration;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Upper bound on the buffer reserved up front; it grows with the data.
const INITIAL_CAPACITY: usize = 64 * 1024;

/// Regroups a body stream into chunks of exactly `chunk_size` bytes.
///
/// Only the final chunk may be shorter. Every poll of the underlying stream
/// is bounded by `timeout`, so a stalled connection surfaces as an error
/// instead of hanging the worker.
pub(crate) struct ChunkReader<S> {
    stream: S,
    pending: BytesMut,
    chunk_size: usize,
    timeout: Duration,
    finished: bool,
}

impl<S, E> ChunkReader<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<BoxError>,
{
    pub(crate) fn new(stream: S, chunk_size: usize, timeout: Duration) -> Self {
        Self {
            stream,
            pending: BytesMut::with_capacity(chunk_size.min(INITIAL_CAPACITY)),
            chunk_size: chunk_size.max(1),
            timeout,
            finished: false,
        }
    }

    /// Next chunk, or `None` once the body is exhausted.
    pub(crate) async fn next_chunk(&mut self) -> Result<Option<Bytes>, BoxError> {
        while !self.finished && self.pending.len() < self.chunk_size {
            match tokio::time::timeout(self.timeout, self.stream.next()).await {
                Err(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "timed out waiting for response data",
                    )
                    .into())
                }
                Ok(None) => self.finished = true,
                Ok(Some(Err(e))) => return Err(e.into()),
                Ok(Some(Ok(bytes))) => self.pending.extend_from_slice(&bytes),
            }
        }

        if self.pending.is_empty() {
            return Ok(None);
        }

        let n = self.chunk_size.min(self.pending.len());
        Ok(Some(self.pending.split_to(n).freeze()))
    }
}
