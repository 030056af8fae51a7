//! Error handling for the splitfetch library.
//!
//! This module provides centralized error handling for every stage of a ranged
//! download: probing the resource, planning byte ranges, and the per-range
//! transfers performed by workers. All errors implement the standard Error
//! trait and keep their underlying cause available through `source()`.

use crate::plan::ByteRange;

use reqwest::StatusCode;
use std::io;
use thiserror::Error;

/// Errors that can happen when using splitfetch.
///
/// The first group of variants is fatal before any file I/O happens
/// (`UnsupportedRange`, `Metadata`, `RangeComputation`). `RangeMismatch` and
/// `Network` are fatal for a single worker only and are reported through that
/// worker's [`Outcome`](crate::worker::Outcome).
#[derive(Error, Debug)]
pub enum Error {
    /// The server does not advertise `Accept-Ranges: bytes`.
    ///
    /// The engine never falls back to a single-stream download.
    #[error("Server does not support byte-range requests for {url}")]
    UnsupportedRange { url: String },

    /// The probe response lacks metadata the engine requires.
    #[error("Invalid resource metadata: {0}")]
    Metadata(String),

    /// No valid range plan exists for the given size and worker count.
    #[error("Cannot split {size} bytes across {workers} workers")]
    RangeComputation { size: u64, workers: usize },

    /// The server ignored or mangled the range request.
    ///
    /// Returned when a ranged fetch is answered with anything other than
    /// `206 Partial Content` for exactly the requested span.
    #[error("Range mismatch for {range}: {reason}")]
    RangeMismatch {
        range: ByteRange,
        status: StatusCode,
        reason: String,
    },

    /// Connection-level failure while transferring a range.
    ///
    /// Carries the range so that a caller can retry it.
    #[error("Network error while fetching {range}")]
    Network {
        range: ByteRange,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error from the underlying URL parser.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A configuration value is out of its accepted domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A tracker update attempted to move progress backwards.
    #[error("Progress cannot move backwards from {current} to {value}")]
    ProgressRegression { current: u64, value: u64 },

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Wraps any transport-level cause into a [`Error::Network`] for `range`.
    pub(crate) fn network<E>(range: ByteRange, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Network {
            range,
            source: source.into(),
        }
    }

    /// Returns the byte range this error is bound to, if any.
    pub fn range(&self) -> Option<ByteRange> {
        match self {
            Error::RangeMismatch { range, .. } | Error::Network { range, .. } => Some(*range),
            _ => None,
        }
    }
}

/// Result type alias for operations that can fail with a splitfetch error.
pub type Result<T> = std::result::Result<T, Error>;
