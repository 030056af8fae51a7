//! HTTP header parsing utilities.
//!
//! This module extracts the pieces of response metadata the engine relies on:
//! byte-range capability, resource length, `Content-Range` spans and a file
//! extension suggested by the content type.

use reqwest::header::{HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH};

/// A parsed `Content-Range` header value.
///
/// `first` and `last` are inclusive offsets, as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    /// First byte delivered.
    pub first: u64,
    /// Last byte delivered (inclusive).
    pub last: u64,
    /// Complete length of the resource, `None` when the server sent `*`.
    pub total: Option<u64>,
}

/// Check whether the headers advertise `bytes` as an accepted range unit.
///
/// `Accept-Ranges` may carry a comma separated list of units; `none` or a
/// missing header means range requests are not supported.
///
/// # Example
///
/// ```rust
/// use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_RANGES};
/// use splitfetch::utils::accepts_byte_ranges;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
/// assert!(accepts_byte_ranges(&headers));
/// ```
pub fn accepts_byte_ranges(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT_RANGES)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"))
}

/// Read the `Content-Length` header.
///
/// Returns None if the header is missing or if its value is not an u64.
/// The header is read directly because the body size hint of a `HEAD`
/// response is always zero.
pub fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Parse a `Content-Range` header value of the form `bytes first-last/total`.
///
/// # Example
///
/// ```rust
/// use splitfetch::utils::parse_content_range;
///
/// let range = parse_content_range("bytes 200-1023/2048").unwrap();
/// assert_eq!((range.first, range.last, range.total), (200, 1023, Some(2048)));
/// ```
pub fn parse_content_range(value: &str) -> Option<ContentRange> {
    let spec = value.trim().strip_prefix("bytes")?.trim_start();
    let (span, total) = spec.split_once('/')?;
    let (first, last) = span.split_once('-')?;

    let first = first.trim().parse::<u64>().ok()?;
    let last = last.trim().parse::<u64>().ok()?;
    if last < first {
        return None;
    }

    let total = match total.trim() {
        "*" => None,
        t => Some(t.parse::<u64>().ok()?),
    };

    Some(ContentRange { first, last, total })
}

/// Suggest a file extension from a content type.
///
/// The subtype is used as-is with parameters stripped, so
/// `application/zip; charset=binary` yields `zip`. Returns None when the
/// content type has no usable subtype, including the generic
/// `application/octet-stream`.
pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    let (_, subtype) = essence.split_once('/')?;
    let subtype = subtype.trim();

    if subtype.is_empty() || subtype == "*" || subtype.eq_ignore_ascii_case("octet-stream") {
        return None;
    }

    Some(subtype.to_ascii_lowercase())
}
