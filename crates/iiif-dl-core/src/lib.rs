pub mod config;
pub mod logging;

pub mod batch;
pub mod control;
pub mod error;
pub mod fetcher;
pub mod image_request;
pub mod manifest;
pub mod pipeline;
pub mod planner;
pub mod resolver;
pub mod retry;
pub mod storage;
pub mod url_model;

pub use batch::{BatchConfig, BatchReport, DownloadOutcome, DownloadTask, ItemProgress};
pub use control::CancelToken;
pub use error::{FetchError, ItemError, ManifestError, WriteError};
pub use image_request::ImageRequestOptions;
pub use pipeline::{batch_download, download_from_manifest, resolve_image_list, Downloader};
