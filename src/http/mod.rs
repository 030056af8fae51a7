//! HTTP module containing HTTP client functionality.
//!
//! This module provides the client used for the metadata probe and for the
//! ranged fetches issued by workers. A caller may supply its own client
//! instead; see [`DownloaderBuilder::client`](crate::DownloaderBuilder::client).
//!
//! # Overview
//!
//! - [`client`] - HTTP client creation and middleware configuration
//!
//! # Examples
//!
//! ```rust
//! use splitfetch::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{create_http_client, HttpClientConfig, DEFAULT_TIMEOUT};
