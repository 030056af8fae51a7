//! Shared utility functions.
//!
//! This module contains helpers used by both the resource prober and the
//! download workers to interpret HTTP response headers.
//!
//! # Overview
//!
//! - [`headers`] - range capability, content length, `Content-Range` parsing
//!   and content-type based extension inference
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::utils::{extension_from_content_type, parse_content_range};
//!
//! let range = parse_content_range("bytes 0-1023/2048").unwrap();
//! assert_eq!(range.total, Some(2048));
//! assert_eq!(extension_from_content_type("video/mp4").as_deref(), Some("mp4"));
//! ```

pub mod headers;

pub use headers::{
    accepts_byte_ranges, extension_from_content_type, parse_content_length, parse_content_range,
    ContentRange,
};
