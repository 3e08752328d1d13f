//! `iiif-dl batch <file|->` – download a plain list of image URLs.

use anyhow::{Context, Result};
use iiif_dl_core::config::IiifDlConfig;
use iiif_dl_core::{BatchConfig, CancelToken, Downloader};
use std::io::Read;

use super::session::{cancel_on_ctrl_c, finish, spawn_progress_printer};

/// URLs from a list file: one per line, surrounding whitespace trimmed, blank
/// lines and `#` comments skipped.
pub(crate) fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading URL list from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("reading URL list {}", input))
}

pub async fn run_batch(cfg: &IiifDlConfig, input: &str, batch: BatchConfig) -> Result<()> {
    let urls = parse_url_list(&read_input(input)?);
    if urls.is_empty() {
        println!("No URLs in {}", input);
        return Ok(());
    }

    let cancel = CancelToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());
    let (progress_tx, printer) = spawn_progress_printer();
    let downloader = Downloader::from_config(cfg)
        .with_cancel(cancel)
        .with_progress(progress_tx);

    println!("Downloading {} image(s) into {}", urls.len(), batch.output_dir.display());
    let report = tokio::task::spawn_blocking(move || downloader.batch_download(&urls, &batch))
        .await
        .context("download task join");
    let _ = printer.join();
    ctrl_c.abort();

    finish(&report?)
}
