//! Metadata probe for a remote resource.

use super::descriptor::ResourceDescriptor;
use crate::error::{Error, Result};
use crate::utils::{accepts_byte_ranges, parse_content_length};

use reqwest::{header::CONTENT_TYPE, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::io;
use std::time::Duration;
use tracing::debug;

/// Content type assumed when the server does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Parse a download URL.
pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url)
        .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e)))
}

/// Probe `url` with a `HEAD` request and describe the resource.
///
/// The request is bounded by `timeout`.
///
/// # Errors
///
/// - [`Error::UnsupportedRange`] if the server does not accept `bytes` ranges.
/// - [`Error::Metadata`] if the response is not successful or lacks a
///   `Content-Length`.
/// - Transport errors from the client, or a timed-out [`Error::IOError`].
pub async fn probe(
    client: &ClientWithMiddleware,
    url: &Url,
    timeout: Duration,
) -> Result<ResourceDescriptor> {
    debug!("Probing {}", url);
    let res = tokio::time::timeout(timeout, client.head(url.clone()).send())
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "probe request timed out"))??;

    let status = res.status();
    if !status.is_success() {
        return Err(Error::Metadata(format!(
            "HEAD {} returned {}",
            url, status
        )));
    }

    let headers = res.headers();
    if !accepts_byte_ranges(headers) {
        return Err(Error::UnsupportedRange {
            url: url.to_string(),
        });
    }

    let total_size = parse_content_length(headers).ok_or_else(|| {
        Error::Metadata(format!("{} did not declare a valid Content-Length", url))
    })?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    debug!(
        "Resource {} is {} bytes of {}",
        url, total_size, content_type
    );

    Ok(ResourceDescriptor::new(
        url.clone(),
        total_size,
        content_type,
        true,
    ))
}
