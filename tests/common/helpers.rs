use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use splitfetch::{DownloaderBuilder, HttpClientConfig};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// Common test constants
pub const FIXTURE_PATH: &str = "/fixture.bin";
pub const TEST_USER_AGENT: &str = "splitfetch-test-agent";

/// Installs a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Creates test content whose bytes do not repeat every 256 positions, so
/// a range written at the wrong offset is detected.
pub fn create_scrambled_content(size: usize) -> Vec<u8> {
    (0..size as u64)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 7) as u8)
        .collect()
}

/// A simple order-dependent checksum.
pub fn checksum(data: &[u8]) -> u64 {
    data.iter().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

/// Asserts that the file at `path` holds exactly `expected`.
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = fs::read(path).expect("Failed to read downloaded file");
    assert_eq!(actual.len(), expected.len(), "Length mismatch at {:?}", path);
    assert!(actual == expected, "Content mismatch at {:?}", path);
}

// === Fixture server ===

/// How the fixture server answers ranged `GET` requests.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Honour the range with `206 Partial Content`.
    Ranged,
    /// Ignore the range and answer `200 OK` with the full body.
    IgnoreRange,
    /// Answer `206` but send only half of the requested bytes.
    Truncate,
    /// Answer `206` with the right bytes but a `Content-Range` one byte off.
    WrongContentRange,
    /// Answer `206` with the requested bytes followed by extra padding.
    Oversize,
    /// Answer `500` for the range starting at this offset.
    FailAt(u64),
    /// Delay every range not starting at offset zero.
    DelayTail(Duration),
    /// Answer `500` for the range starting at the offset and delay the others.
    FailAtDelayOthers(u64, Duration),
}

/// A responder serving byte ranges of a fixed body.
pub struct RangeResponder {
    body: Arc<Vec<u8>>,
    behavior: Behavior,
}

impl RangeResponder {
    pub fn new(body: Vec<u8>, behavior: Behavior) -> Self {
        Self {
            body: Arc::new(body),
            behavior,
        }
    }

    fn partial(&self, first: u64, last: u64) -> ResponseTemplate {
        let total = self.body.len() as u64;
        ResponseTemplate::new(206)
            .insert_header(
                "content-range",
                format!("bytes {}-{}/{}", first, last, total).as_str(),
            )
            .set_body_bytes(self.body[first as usize..=last as usize].to_vec())
    }
}

/// Parse a `Range: bytes=first-last` request header, clamped to `total`.
pub fn parse_range_header(value: &str, total: u64) -> Option<(u64, u64)> {
    let spec = value.trim().strip_prefix("bytes=")?;
    let (first, last) = spec.split_once('-')?;
    let first = first.trim().parse::<u64>().ok()?;
    let last = match last.trim() {
        "" => total.checked_sub(1)?,
        l => l.parse::<u64>().ok()?.min(total.checked_sub(1)?),
    };
    (first <= last).then_some((first, last))
}

impl Respond for RangeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let total = self.body.len() as u64;
        let range = request
            .headers
            .get("range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| parse_range_header(v, total));

        let Some((first, last)) = range else {
            return ResponseTemplate::new(200).set_body_bytes(self.body.as_slice());
        };

        match self.behavior {
            Behavior::Ranged => self.partial(first, last),
            Behavior::IgnoreRange => {
                ResponseTemplate::new(200).set_body_bytes(self.body.as_slice())
            }
            Behavior::Truncate => {
                let short = first + (last - first) / 2;
                ResponseTemplate::new(206)
                    .insert_header(
                        "content-range",
                        format!("bytes {}-{}/{}", first, last, total).as_str(),
                    )
                    .set_body_bytes(self.body[first as usize..short as usize].to_vec())
            }
            Behavior::WrongContentRange => ResponseTemplate::new(206)
                .insert_header(
                    "content-range",
                    format!("bytes {}-{}/{}", first + 1, last + 1, total).as_str(),
                )
                .set_body_bytes(self.body[first as usize..=last as usize].to_vec()),
            Behavior::Oversize => {
                let mut padded = self.body[first as usize..=last as usize].to_vec();
                padded.extend_from_slice(&[0u8; 16]);
                ResponseTemplate::new(206)
                    .insert_header(
                        "content-range",
                        format!("bytes {}-{}/{}", first, last, total).as_str(),
                    )
                    .set_body_bytes(padded)
            }
            Behavior::FailAt(offset) if offset == first => ResponseTemplate::new(500),
            Behavior::FailAt(_) => self.partial(first, last),
            Behavior::DelayTail(delay) if first > 0 => self.partial(first, last).set_delay(delay),
            Behavior::DelayTail(_) => self.partial(first, last),
            Behavior::FailAtDelayOthers(offset, _) if offset == first => {
                ResponseTemplate::new(500)
            }
            Behavior::FailAtDelayOthers(_, delay) => self.partial(first, last).set_delay(delay),
        }
    }
}

/// The `HEAD` response of a range-capable fixture of `body`.
pub fn head_response(body: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("accept-ranges", "bytes")
        .insert_header("content-type", "application/octet-stream")
        .insert_header("content-length", body.len().to_string().as_str())
        .set_body_bytes(body.to_vec())
}

/// Starts a server exposing `body` at [`FIXTURE_PATH`].
pub async fn start_fixture_server(body: Vec<u8>, behavior: Behavior) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path(FIXTURE_PATH))
        .respond_with(head_response(&body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FIXTURE_PATH))
        .respond_with(RangeResponder::new(body, behavior))
        .mount(&server)
        .await;
    server
}

/// The fixture URL of a running server.
pub fn fixture_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), FIXTURE_PATH)
}

// === Builder helpers ===

/// A builder writing into `dir`, without retries so failures surface at once.
pub fn create_test_builder(dir: &Path) -> DownloaderBuilder {
    DownloaderBuilder::new()
        .directory(dir.to_path_buf())
        .retries(0)
        .timeout(Duration::from_secs(10))
}

/// Creates a HeaderMap carrying the test user agent
pub fn create_test_headers() -> HeaderMap {
    create_test_headers_with_agent(TEST_USER_AGENT)
}

/// Creates a HeaderMap with a custom user agent
pub fn create_test_headers_with_agent(agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(agent).expect("Invalid user agent"),
    );
    headers
}

/// Creates an HTTP client config with the test headers
pub fn create_test_http_config() -> HttpClientConfig {
    HttpClientConfig {
        headers: Some(create_test_headers()),
        ..HttpClientConfig::default()
    }
}

/// Creates an HTTP client config with the given number of retries
pub fn create_test_http_config_with_retries(retries: u32) -> HttpClientConfig {
    HttpClientConfig {
        retries,
        ..create_test_http_config()
    }
}
