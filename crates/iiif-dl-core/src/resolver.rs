//! Turns a manifest into the ordered list of image URLs to download.
//!
//! Without image request options each canvas' direct resource URL is used
//! verbatim. With options, URLs are templated against the canvas' Image API
//! service.

use crate::control::CancelToken;
use crate::error::ManifestError;
use crate::fetcher::Fetcher;
use crate::image_request::ImageRequestOptions;
use crate::manifest::{fetch_manifest, CanvasImage};
use crate::retry::RetryPolicy;

/// Source URLs for `canvases`, optionally reversed.
pub fn resolve_urls(canvases: &[CanvasImage], options: Option<&ImageRequestOptions>, reverse: bool) -> Vec<String> {
    let mut urls: Vec<String> = match options {
        None => canvases.iter().map(|c| c.resource_id.clone()).collect(),
        Some(options) => {
            let request = options.resolve();
            canvases
                .iter()
                .enumerate()
                .map(|(i, canvas)| match canvas.service_id.as_deref() {
                    Some(service) => request.url_for_service(service),
                    None => {
                        tracing::warn!(
                            canvas = i,
                            label = canvas.label.as_deref().unwrap_or(""),
                            resource = %canvas.resource_id,
                            "no image service; using direct resource URL"
                        );
                        canvas.resource_id.clone()
                    }
                })
                .collect()
        }
    };
    if reverse {
        urls.reverse();
    }
    urls
}

/// Fetches the manifest at `manifest_url` and resolves its image URLs.
pub fn resolve_image_list(
    fetcher: &dyn Fetcher,
    manifest_url: &str,
    reverse: bool,
    options: Option<&ImageRequestOptions>,
    retry: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<Vec<String>, ManifestError> {
    let canvases = fetch_manifest(fetcher, manifest_url, retry, cancel)?;
    let urls = resolve_urls(&canvases, options, reverse);
    tracing::info!(manifest = manifest_url, images = urls.len(), "resolved image list");
    Ok(urls)
}
