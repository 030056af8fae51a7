//! Splitfetch downloads a single HTTP resource in parallel: it splits the
//! resource into disjoint byte ranges, fetches each range concurrently and
//! writes every range at its offset in one output file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use splitfetch::{DownloaderBuilder, Error, Status};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let downloader = DownloaderBuilder::new().workers(8).build();
//! let summary = downloader
//!     .download("https://example.com/archive.zip", Some("archive.zip".into()))
//!     .await?;
//! assert_eq!(summary.status(), &Status::Complete);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`resource`] - `HEAD` probe and the [`ResourceDescriptor`]
//! - [`plan`] - splitting a resource into [`ByteRange`]s
//! - [`progress`] - per-range [`ProgressTracker`]s and read-only views
//! - [`worker`] - one [`Worker`] per range and the shared [`OutputFile`]
//! - [`download`] - the [`Download`] state with start/cancel/join and [`Summary`]
//! - [`downloader`] - the [`Downloader`] entry point and its builder
//! - [`error`] - the [`Error`] enum
//! - [`http`] - HTTP client construction
//! - [`utils`] - HTTP header parsing

pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod plan;
pub mod progress;
pub mod resource;
pub mod utils;
pub mod worker;

pub use download::{Download, Status, Summary, WorkerSummary};
pub use downloader::{Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
pub use plan::{compute_ranges, ByteRange};
pub use progress::{overall_fraction, ProgressHandle, ProgressSnapshot, ProgressTracker};
pub use resource::{probe, ResourceDescriptor};
pub use worker::{Outcome, OutputFile, Worker, WorkerState};
