//! Immutable description of a probed remote resource.

use crate::utils::extension_from_content_type;

use reqwest::Url;

/// Extension used when the content type does not suggest one.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Metadata about a remote resource, created once from the probe response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    url: Url,
    total_size: u64,
    content_type: String,
    supports_ranges: bool,
}

impl ResourceDescriptor {
    /// Creates a new [`ResourceDescriptor`].
    pub fn new(url: Url, total_size: u64, content_type: &str, supports_ranges: bool) -> Self {
        Self {
            url,
            total_size,
            content_type: content_type.to_string(),
            supports_ranges,
        }
    }

    /// URL of the resource.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Declared length of the resource in bytes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Declared content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Whether the server advertised byte-range support.
    pub fn supports_ranges(&self) -> bool {
        self.supports_ranges
    }

    /// File extension suggested by the content type.
    pub fn extension(&self) -> String {
        extension_from_content_type(&self.content_type)
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
    }

    /// Generated file name for this resource, e.g. `download_1700000000.zip`.
    pub fn generated_filename(&self, unix_seconds: u64) -> String {
        format!("download_{}.{}", unix_seconds, self.extension())
    }
}
