//! Progress module containing per-range progress tracking.
//!
//! The engine never pushes progress events. Consumers poll snapshots at their
//! own cadence, either from a [`Download`](crate::Download) or through
//! [`ProgressHandle`]s that do not keep the download's trackers alive.
//!
//! # Overview
//!
//! - `tracker` - the single-writer [`ProgressTracker`], read-only
//!   [`ProgressHandle`] and the [`ProgressSnapshot`] record
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::progress::{overall_fraction, ProgressTracker};
//!
//! let tracker = ProgressTracker::new(0, 1000);
//! tracker.update(250)?;
//! assert_eq!(tracker.fraction(), 0.25);
//! assert_eq!(overall_fraction(&[tracker.snapshot()]), 0.25);
//! # Ok::<(), splitfetch::Error>(())
//! ```

pub(crate) mod tracker;

pub use tracker::{overall_fraction, ProgressHandle, ProgressSnapshot, ProgressTracker};
