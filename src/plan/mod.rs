//! Range planning.
//!
//! This module turns a resource size and a worker count into the ordered list
//! of disjoint byte ranges that the workers download.
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::plan::compute_ranges;
//!
//! let ranges = compute_ranges(1_000, 4)?;
//! assert_eq!(ranges.len(), 4);
//! assert_eq!(ranges[3].end(), 1_000);
//! # Ok::<(), splitfetch::Error>(())
//! ```

pub mod range;

pub use range::{compute_ranges, ByteRange};
