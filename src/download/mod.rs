//! Download module containing the state of a single ranged download.
//!
//! This module provides the [`Download`] struct, which owns the range plan and
//! the workers for one resource, and the [`Summary`] and [`Status`] types
//! used to report per-worker outcomes and the overall result.
//!
//! # Overview
//!
//! - [`download`] - the prepared/started [`Download`] and its operations
//! - [`summary`] - outcome reporting with [`Summary`] and [`Status`]
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::download::Status;
//!
//! let status = Status::Cancelled;
//! assert!(status.is_terminal());
//! assert!(!Status::InProgress.is_terminal());
//! ```

pub mod download;
pub mod summary;

pub use download::Download;
pub use summary::{Status, Summary, WorkerSummary};
