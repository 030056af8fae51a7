//! Configuration structures and defaults for the downloader.
//!
//! This module provides the configuration used by the [`Downloader`] and
//! [`DownloaderBuilder`]: worker count, chunk size, timeouts, HTTP client
//! settings and the completion callback.
//!
//! [`Downloader`]: super::Downloader
//! [`DownloaderBuilder`]: super::DownloaderBuilder
//!
//! # Examples
//!
//! ## Using Callbacks
//!
//! ```rust
//! use splitfetch::downloader::CompletionCallback;
//! use splitfetch::download::{Summary, Status};
//!
//! let callback: CompletionCallback = Box::new(|summary: &Summary| {
//!     match summary.status() {
//!         Status::Complete => println!("✓ {:?}", summary.target()),
//!         Status::Failed { failed } => println!("✗ {} ranges failed", failed.len()),
//!         Status::Cancelled => println!("- cancelled"),
//!         _ => {}
//!     }
//! });
//! ```

use crate::download::Summary;
use crate::http::{HttpClientConfig, DEFAULT_TIMEOUT};

use reqwest::header::HeaderMap;
use reqwest_middleware::ClientWithMiddleware;
use std::env::current_dir;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for download completion events.
pub type CompletionCallback = Box<dyn Fn(&Summary) + Send + Sync>;

/// Default number of workers (and ranges) per download.
pub const DEFAULT_WORKERS: usize = 8;

/// Default read/write chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory for generated target file names.
    pub directory: std::path::PathBuf,
    /// Number of workers, one per byte range.
    pub workers: usize,
    /// Size of each read/write chunk in bytes.
    pub chunk_size: usize,
    /// Bound on every outbound request and response read.
    pub timeout: Duration,
    /// Number of retries for requests failing with a transient error.
    pub retries: u32,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Caller-supplied client used instead of building one.
    pub client: Option<ClientWithMiddleware>,
    /// Cancel the remaining workers as soon as one fails.
    pub fail_fast: bool,
    /// Callback for when a download reaches a terminal state.
    pub on_complete: Option<Arc<CompletionCallback>>,
}

impl DownloaderConfig {
    /// Client settings derived from this configuration.
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            retries: self.retries,
            proxy: self.proxy.clone(),
            headers: self.headers.clone(),
            timeout: self.timeout,
        }
    }
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("workers", &self.workers)
            .field("chunk_size", &self.chunk_size)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field("client", &self.client.is_some())
            .field("fail_fast", &self.fail_fast)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: DEFAULT_TIMEOUT,
            retries: 3,
            headers: None,
            proxy: None,
            client: None,
            fail_fast: false,
            on_complete: None,
        }
    }
}
