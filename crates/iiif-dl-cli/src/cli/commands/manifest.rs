//! `iiif-dl manifest <url>` – download every image of a manifest.

use anyhow::{Context, Result};
use iiif_dl_core::config::IiifDlConfig;
use iiif_dl_core::{CancelToken, Downloader, ImageRequestOptions};
use std::path::PathBuf;

use super::session::{cancel_on_ctrl_c, finish, spawn_progress_printer};

pub async fn run_manifest(
    cfg: &IiifDlConfig,
    url: &str,
    output_dir: PathBuf,
    jobs: usize,
    reverse: bool,
    options: Option<ImageRequestOptions>,
) -> Result<()> {
    let cancel = CancelToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());
    let (progress_tx, printer) = spawn_progress_printer();
    let downloader = Downloader::from_config(cfg)
        .with_cancel(cancel)
        .with_progress(progress_tx);

    println!("Downloading {} into {}", url, output_dir.display());
    let result = tokio::task::spawn_blocking({
        let url = url.to_string();
        move || downloader.download_from_manifest(&url, &output_dir, jobs, reverse, options.as_ref())
    })
    .await
    .context("download task join");

    // The downloader (and its progress sender) is gone once the task returns.
    let _ = printer.join();
    ctrl_c.abort();

    let report = result?.with_context(|| format!("reading manifest {}", url))?;
    finish(&report)
}
