//! Public entry points: resolve a manifest, download a URL list, or both.
//!
//! `Downloader` bundles what every run needs (fetcher, retry policy, cancel
//! token, optional progress channel). The free functions use a default
//! libcurl-backed `Downloader`.

use std::path::Path;
use std::sync::mpsc::Sender;

use crate::batch::{run_batch, BatchConfig, BatchReport, EngineOptions, ItemProgress};
use crate::config::IiifDlConfig;
use crate::control::CancelToken;
use crate::error::ManifestError;
use crate::fetcher::{CurlFetcher, FetchOptions, Fetcher};
use crate::image_request::ImageRequestOptions;
use crate::planner::plan_tasks;
use crate::resolver;
use crate::retry::RetryPolicy;

pub struct Downloader {
    fetcher: Box<dyn Fetcher>,
    retry: RetryPolicy,
    cancel: CancelToken,
    progress: Option<Sender<ItemProgress>>,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new(CurlFetcher::new(FetchOptions::default()))
    }
}

impl Downloader {
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            retry: RetryPolicy::default(),
            cancel: CancelToken::new(),
            progress: None,
        }
    }

    /// libcurl fetcher and retry policy built from `config`.
    pub fn from_config(config: &IiifDlConfig) -> Self {
        Self::new(CurlFetcher::new(config.fetch_options())).with_retry(RetryPolicy::from(&config.retry_config()))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Every finished item is also sent to `progress`.
    pub fn with_progress(mut self, progress: Sender<ItemProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Fetches and parses `manifest_url`, returning the image URLs in manifest
    /// order (or reversed). With `options`, URLs are templated against each
    /// canvas' image service.
    pub fn resolve_image_list(
        &self,
        manifest_url: &str,
        reverse: bool,
        options: Option<&ImageRequestOptions>,
    ) -> Result<Vec<String>, ManifestError> {
        resolver::resolve_image_list(self.fetcher.as_ref(), manifest_url, reverse, options, &self.retry, &self.cancel)
    }

    /// Downloads `urls` into `config.output_dir`. Never fails as a whole: the
    /// report holds one outcome per URL.
    pub fn batch_download<S: AsRef<str>>(&self, urls: &[S], config: &BatchConfig) -> BatchReport {
        let mut ordered: Vec<&str> = urls.iter().map(AsRef::as_ref).collect();
        if config.reverse_order {
            ordered.reverse();
        }
        let tasks = plan_tasks(&ordered, &config.output_dir, config.rename_sequentially);
        let engine = EngineOptions {
            concurrency: config.concurrency,
            retry: self.retry,
            cancel: self.cancel.clone(),
            progress: self.progress.clone(),
        };
        run_batch(tasks, self.fetcher.as_ref(), &engine)
    }

    /// Resolves the manifest, then downloads every image as `001.ext`,
    /// `002.ext`, ... Manifest errors abort before any download starts.
    pub fn download_from_manifest(
        &self,
        manifest_url: &str,
        output_dir: &Path,
        concurrency: usize,
        reverse: bool,
        options: Option<&ImageRequestOptions>,
    ) -> Result<BatchReport, ManifestError> {
        let urls = self.resolve_image_list(manifest_url, reverse, options)?;
        let config = BatchConfig {
            output_dir: output_dir.to_path_buf(),
            concurrency,
            rename_sequentially: true,
            reverse_order: false,
        };
        Ok(self.batch_download(&urls, &config))
    }
}

/// `Downloader::resolve_image_list` with default settings.
pub fn resolve_image_list(
    manifest_url: &str,
    reverse: bool,
    options: Option<&ImageRequestOptions>,
) -> Result<Vec<String>, ManifestError> {
    Downloader::default().resolve_image_list(manifest_url, reverse, options)
}

/// `Downloader::batch_download` with default settings.
pub fn batch_download<S: AsRef<str>>(urls: &[S], config: &BatchConfig) -> BatchReport {
    Downloader::default().batch_download(urls, config)
}

/// `Downloader::download_from_manifest` with default settings.
pub fn download_from_manifest(
    manifest_url: &str,
    output_dir: &Path,
    concurrency: usize,
    reverse: bool,
    options: Option<&ImageRequestOptions>,
) -> Result<BatchReport, ManifestError> {
    Downloader::default().download_from_manifest(manifest_url, output_dir, concurrency, reverse, options)
}
