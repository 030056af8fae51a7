//! Builder pattern implementation for creating Downloader instances.
//!
//! This module provides the [`DownloaderBuilder`] struct that implements the
//! builder pattern for configuring and creating [`Downloader`] instances.
//!
//! # Examples
//!
//! ## Basic Builder Usage
//!
//! ```rust
//! use splitfetch::downloader::DownloaderBuilder;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .workers(4)
//!     .chunk_size(128 * 1024)
//!     .timeout(Duration::from_secs(10))
//!     .build();
//! ```
//!
//! ## Completion Callback
//!
//! ```rust
//! use splitfetch::downloader::DownloaderBuilder;
//! use splitfetch::download::Status;
//!
//! let downloader = DownloaderBuilder::new()
//!     .on_complete(|summary| {
//!         if let Status::Failed { failed } = summary.status() {
//!             eprintln!("retry these ranges: {:?}", failed);
//!         }
//!     })
//!     .build();
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::download::Summary;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use reqwest_middleware::ClientWithMiddleware;
use std::time::Duration;
use std::{path::PathBuf, sync::Arc};

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main()  {
/// use splitfetch::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().workers(16).directory("downloads".into()).build();
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Sets the directory used for generated target file names.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the number of workers, i.e. the number of byte ranges.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the read/write chunk size in bytes.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Set the bound applied to every request and every response read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of retries for requests failing with a transient error.
    ///
    /// Retries only happen before a response is received; a range that fails
    /// mid-transfer is reported as failed.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set a proxy for the built client.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Use a caller-supplied client.
    ///
    /// Accepts either a `ClientWithMiddleware` or a plain `reqwest::Client`.
    /// The retry, proxy and header settings of this builder then do not
    /// apply; timeouts still do.
    pub fn client(mut self, client: impl Into<ClientWithMiddleware>) -> Self {
        self.config.client = Some(client.into());
        self
    }

    /// Cancel the remaining workers as soon as one worker fails.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.fail_fast = fail_fast;
        self
    }

    /// Set callback for when a download reaches a terminal state.
    ///
    /// # Example
    ///
    /// ```rust
    /// use splitfetch::downloader::DownloaderBuilder;
    /// use splitfetch::download::Status;
    ///
    /// let downloader = DownloaderBuilder::new()
    ///     .on_complete(|summary| {
    ///         match summary.status() {
    ///             Status::Complete => println!("[Complete] {:?}", summary.target()),
    ///             Status::Cancelled => println!("[Cancelled] {:?}", summary.target()),
    ///             status => println!("[{:?}] {:?}", status, summary.target()),
    ///         }
    ///     })
    ///     .build();
    /// ```
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Summary) + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be
    /// merged into a single one.
    ///
    /// See also [`header()`].
    ///
    /// [`header()`]: DownloaderBuilder::header
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use splitfetch::downloader::DownloaderBuilder;
    ///
    /// let ua = HeaderValue::from_str("splitfetch/0.1").expect("Invalid UA");
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .header(header::USER_AGENT, ua)
    ///     .build();
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}
