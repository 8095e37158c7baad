//! HTTP page fetching with browser-like headers and encoding detection.
//!
//! Listing pages and article pages are both downloaded through the
//! [`PageFetcher`] trait. [`HttpFetcher`] is the real implementation; tests
//! substitute a fetcher that serves canned markup.
//!
//! Response bodies are decoded from raw bytes. The charset declared by the
//! server is ignored: the encoding is sniffed from a byte-order mark or, when
//! there is none, guessed statistically with `chardetng`.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use tracing::{debug, instrument};

/// Headers sent with every page request.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[(
    "user-agent",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
)];

/// Why a page could not be fetched.
///
/// A non-2xx answer and a request that never got an answer are kept apart
/// because callers report them differently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Connection, DNS, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The HTTP client could not be built.
    #[error("invalid HTTP client setup: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    /// The body decoded with the detected encoding.
    pub text: String,
}

/// Trait for downloading a page by URL.
pub trait PageFetcher {
    /// GET `url` and return the decoded body of a 2xx response.
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// [`PageFetcher`] backed by a `reqwest` client carrying [`DEFAULT_HEADERS`].
///
/// No timeout is configured beyond the client's defaults and failed
/// requests are not retried.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(default_header_map()?)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let text = decode_body(&bytes);
        debug!(status = status.as_u16(), bytes = bytes.len(), "Fetched page");
        Ok(Page {
            status: status.as_u16(),
            text,
        })
    }
}

/// Build the header map installed on the HTTP client.
pub fn default_header_map() -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    for &(name, value) in DEFAULT_HEADERS {
        let name = HeaderName::from_static(name);
        let value =
            HeaderValue::from_str(value).map_err(|e| FetchError::Client(e.to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Decode a response body using the encoding detected from its bytes.
pub fn decode_body(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = encoding.name(), "Body contained malformed sequences");
    }
    text.into_owned()
}

/// Guess the encoding of `bytes`: byte-order mark first, then content analysis.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}
