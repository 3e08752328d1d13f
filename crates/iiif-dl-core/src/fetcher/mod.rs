//! Single-request HTTP(S) retrieval.
//!
//! The engine only depends on the `Fetcher` trait; `CurlFetcher` is the
//! libcurl-backed implementation used outside of tests.

mod easy;

pub use easy::CurlFetcher;

use std::time::Duration;

use crate::control::CancelToken;
use crate::error::FetchError;

/// Transport selected from the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `http://`
    Plain,
    /// `https://`
    Tls,
}

impl Transport {
    /// Parses `url` and maps its scheme to a transport.
    pub fn for_url(url: &str) -> Result<Transport, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" => Ok(Transport::Plain),
            "https" => Ok(Transport::Tls),
            other => Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: other.to_string(),
            }),
        }
    }
}

/// Per-request limits and identity.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Wall-clock bound on the whole request, body included.
    pub timeout: Duration,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub max_redirects: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            user_agent: default_user_agent(),
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

pub fn default_user_agent() -> String {
    format!("iiif-dl/{}", env!("CARGO_PKG_VERSION"))
}

/// Performs one GET and returns the full response body.
///
/// Implementations must return `FetchError::Status` for non-2xx responses and
/// should stop promptly with `FetchError::Cancelled` once `cancel` is set.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Vec<u8>, FetchError>;
}
