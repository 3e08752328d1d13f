//! IIIF Presentation manifest model.
//!
//! Extracts, per canvas, the direct image identifier and (when present) the
//! Image API service base identifier. Both Presentation 2.x (`sequences`) and
//! 3.x (`items`) layouts are accepted.

mod parse;

use crate::control::CancelToken;
use crate::error::ManifestError;
use crate::fetcher::Fetcher;
use crate::retry::{fetch_with_retry, RetryPolicy};

/// One canvas' image, as referenced by the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasImage {
    pub label: Option<String>,
    /// Direct image URL (`resource.@id` / `body.id`).
    pub resource_id: String,
    /// Image API service base (`service.@id` / `service[0].id`), if any.
    pub service_id: Option<String>,
}

/// Parses a manifest body. `url` is only used in error messages.
pub fn parse_manifest(url: &str, body: &[u8]) -> Result<Vec<CanvasImage>, ManifestError> {
    parse::parse_canvases(body).map_err(|reason| ManifestError::Parse {
        url: url.to_string(),
        reason,
    })
}

/// Retrieves and parses the manifest at `url`.
pub fn fetch_manifest(
    fetcher: &dyn Fetcher,
    url: &str,
    retry: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Vec<CanvasImage>, ManifestError> {
    let body = fetch_with_retry(fetcher, url, retry, cancel).map_err(|source| ManifestError::Fetch {
        url: url.to_string(),
        source,
    })?;
    let canvases = parse_manifest(url, &body)?;
    tracing::debug!(url, canvases = canvases.len(), "manifest parsed");
    Ok(canvases)
}
