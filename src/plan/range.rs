//! Byte ranges and the range planner.
//!
//! A plan partitions `[0, size)` into ascending, contiguous, non-empty
//! [`ByteRange`]s, one per worker.

use crate::error::{Error, Result};

use std::fmt;

/// A half-open `[start, end)` span of a resource's bytes.
///
/// `end > start` always holds; empty ranges cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteRange {
    start: u64,
    end: u64,
}

impl ByteRange {
    /// Creates a range, or `None` when `end <= start`.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// First byte of the range (inclusive).
    pub fn start(&self) -> u64 {
        self.start
    }

    /// One past the last byte of the range (exclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Always `false`: a `ByteRange` holds at least one byte.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Last byte of the range (inclusive), as used by HTTP range headers.
    pub fn last(&self) -> u64 {
        self.end - 1
    }

    /// Value for the `Range` request header, e.g. `bytes=0-1023`.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.last())
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Splits `[0, size)` into at most `workers` contiguous ranges.
///
/// Every range but the last has length `ceil(size / n)` where
/// `n = min(workers, size)`; the last range is clamped to `size`. The result
/// therefore covers the resource exactly and never holds an empty range. When
/// there are more workers than bytes, each range is a single byte.
///
/// # Errors
///
/// [`Error::RangeComputation`] when `size` or `workers` is zero.
///
/// # Example
///
/// ```rust
/// use splitfetch::plan::compute_ranges;
///
/// let ranges = compute_ranges(10, 3).unwrap();
/// let bounds: Vec<_> = ranges.iter().map(|r| (r.start(), r.end())).collect();
/// assert_eq!(bounds, vec![(0, 4), (4, 8), (8, 10)]);
/// ```
pub fn compute_ranges(size: u64, workers: usize) -> Result<Vec<ByteRange>> {
    if size == 0 || workers == 0 {
        return Err(Error::RangeComputation { size, workers });
    }

    let effective = (workers as u64).min(size);
    let chunk_size = size.div_ceil(effective);

    let mut ranges = Vec::with_capacity(effective as usize);
    let mut start = 0;
    while start < size {
        let end = start.saturating_add(chunk_size).min(size);
        ranges.push(ByteRange { start, end });
        start = end;
    }

    Ok(ranges)
}
