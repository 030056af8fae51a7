//! Downloader module containing the entry point, builder pattern and
//! configuration.
//!
//! This module provides the main [`Downloader`] struct and its builder. A
//! downloader holds configuration and turns a URL into a prepared
//! [`Download`](crate::Download): it probes the resource, computes the range
//! plan and creates the workers.
//!
//! # Overview
//!
//! - `downloader` - Core Downloader struct with `prepare` and `download`
//! - `builder` - DownloaderBuilder for flexible configuration
//! - `config` - Configuration structure and callback type
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::downloader::DownloaderBuilder;
//!
//! let downloader = DownloaderBuilder::new()
//!     .workers(4)
//!     .retries(0)
//!     .fail_fast(true)
//!     .build();
//! assert_eq!(downloader.workers(), 4);
//! ```

pub mod builder;
pub mod config;
pub mod downloader;

pub use builder::DownloaderBuilder;
pub use config::{CompletionCallback, DownloaderConfig, DEFAULT_CHUNK_SIZE, DEFAULT_WORKERS};
pub use downloader::Downloader;
