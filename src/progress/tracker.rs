//! Per-range progress tracking.
//!
//! Each worker owns one [`ProgressTracker`] and is its only writer. Any number
//! of readers may observe it concurrently without blocking; they see
//! stale-but-monotonic values.

use crate::error::{Error, Result};
use crate::plan::ByteRange;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Width of the bar drawn by the [`ProgressSnapshot`] `Display` impl.
const BAR_WIDTH: usize = 20;

/// Mutable progress record for one byte range.
///
/// `current` only moves forward and always stays within `[start, end]`.
#[derive(Debug)]
pub struct ProgressTracker {
    start: u64,
    end: u64,
    current: AtomicU64,
}

impl ProgressTracker {
    /// Creates a tracker for `[start, end)` positioned at `start`.
    ///
    /// `end` smaller than `start` is treated as `start`.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: end.max(start),
            current: AtomicU64::new(start),
        }
    }

    /// Creates a tracker covering `range`.
    pub fn for_range(range: ByteRange) -> Self {
        Self::new(range.start(), range.end())
    }

    /// Start of the tracked range.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// End of the tracked range (exclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Absolute offset reached so far.
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    /// Move `current` forward to the absolute offset `value`.
    ///
    /// Values past `end` are clamped to `end`.
    ///
    /// # Errors
    ///
    /// [`Error::ProgressRegression`] if `value` is lower than `current`; the
    /// tracker is left unchanged.
    pub fn update(&self, value: u64) -> Result<()> {
        let value = value.min(self.end);
        self.current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (value >= current).then_some(value)
            })
            .map(|_| ())
            .map_err(|current| Error::ProgressRegression { current, value })
    }

    /// Completion fraction in `[0, 1]`. An empty range is complete.
    pub fn fraction(&self) -> f64 {
        fraction(self.start, self.current(), self.end)
    }

    /// Whether the whole range has been written.
    pub fn is_done(&self) -> bool {
        self.current() >= self.end
    }

    /// A consistent copy of the tracker's state.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let current = self.current();
        ProgressSnapshot {
            range_start: self.start,
            range_end: self.end,
            current,
            done: current >= self.end,
        }
    }
}

fn fraction(start: u64, current: u64, end: u64) -> f64 {
    if end == start {
        return 1.0;
    }
    let p = current.saturating_sub(start) as f64 / (end - start) as f64;
    p.clamp(0.0, 1.0)
}

/// Read-only, non-owning view of a [`ProgressTracker`].
///
/// A handle never keeps the tracker alive: once the owning download is
/// dropped, every read returns `None`.
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    tracker: Weak<ProgressTracker>,
}

impl ProgressHandle {
    /// Creates a handle observing `tracker`.
    pub fn new(tracker: &Arc<ProgressTracker>) -> Self {
        Self {
            tracker: Arc::downgrade(tracker),
        }
    }

    /// Current state, if the tracker is still alive.
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        self.tracker.upgrade().map(|t| t.snapshot())
    }

    /// Completion fraction, if the tracker is still alive.
    pub fn fraction(&self) -> Option<f64> {
        self.tracker.upgrade().map(|t| t.fraction())
    }

    /// Whether the range is done, if the tracker is still alive.
    pub fn is_done(&self) -> Option<bool> {
        self.tracker.upgrade().map(|t| t.is_done())
    }
}

/// Point-in-time progress of one range, as consumed by presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// First byte of the range.
    pub range_start: u64,
    /// End of the range (exclusive).
    pub range_end: u64,
    /// Absolute offset reached.
    pub current: u64,
    /// Whether the range is complete.
    pub done: bool,
}

impl ProgressSnapshot {
    /// Completion fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        fraction(self.range_start, self.current, self.range_end)
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.current.saturating_sub(self.range_start)
    }

    /// Length of the range.
    pub fn len(&self) -> u64 {
        self.range_end - self.range_start
    }

    /// Whether the range holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ProgressSnapshot {
    /// Renders `|=====               | [25.00%] [256/1024]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.fraction();
        let filled = ((BAR_WIDTH as f64) * p).round() as usize;
        write!(
            f,
            "|{}{}| [{:.2}%] [{}/{}]",
            "=".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            p * 100.0,
            self.written(),
            self.len()
        )
    }
}

/// Overall completion across ranges, weighted by range length.
///
/// Ranges at the end of a plan may be shorter, so a plain average of the
/// per-range fractions would misstate progress. An empty set is complete.
pub fn overall_fraction(snapshots: &[ProgressSnapshot]) -> f64 {
    let total: u64 = snapshots.iter().map(ProgressSnapshot::len).sum();
    if total == 0 {
        return 1.0;
    }
    let written: u64 = snapshots
        .iter()
        .map(|s| s.written().min(s.len()))
        .sum();
    written as f64 / total as f64
}
