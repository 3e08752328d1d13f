//! `iiif-dl list <url>` – print the image URLs of a manifest.

use anyhow::{Context, Result};
use iiif_dl_core::config::IiifDlConfig;
use iiif_dl_core::{CancelToken, Downloader, ImageRequestOptions};

use super::session::cancel_on_ctrl_c;

pub async fn run_list(
    cfg: &IiifDlConfig,
    url: &str,
    reverse: bool,
    options: Option<ImageRequestOptions>,
) -> Result<()> {
    let cancel = CancelToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());
    let downloader = Downloader::from_config(cfg).with_cancel(cancel);

    let urls = tokio::task::spawn_blocking({
        let url = url.to_string();
        move || downloader.resolve_image_list(&url, reverse, options.as_ref())
    })
    .await
    .context("manifest task join")?;
    ctrl_c.abort();

    let urls = urls.with_context(|| format!("reading manifest {}", url))?;
    for image_url in &urls {
        println!("{}", image_url);
    }
    Ok(())
}
