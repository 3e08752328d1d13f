//! Plumbing shared by the downloading commands: Ctrl-C, progress lines, summary.

use anyhow::{bail, Result};
use iiif_dl_core::batch::{BatchReport, ItemProgress};
use iiif_dl_core::error::display_chain;
use iiif_dl_core::CancelToken;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Cancels `cancel` on the first Ctrl-C. Abort the handle once the run is over.
pub fn cancel_on_ctrl_c(cancel: CancelToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("interrupted, stopping downloads...");
            tracing::info!("ctrl-c received, cancelling");
            cancel.cancel();
        }
    })
}

/// Prints one line per finished item until every sender is dropped.
pub fn spawn_progress_printer() -> (mpsc::Sender<ItemProgress>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<ItemProgress>();
    let handle = std::thread::spawn(move || {
        for item in rx {
            println!("{}", item);
        }
    });
    (tx, handle)
}

/// Prints the summary and turns failures or cancellation into an error.
pub fn finish(report: &BatchReport) -> Result<()> {
    let summary = report.summary();
    println!("{}", summary);
    let failures = report.failures();
    for (task, err) in failures.iter().filter(|(_, e)| !e.is_cancelled()) {
        eprintln!("  #{} {}: {}", task.sequence_index, task.source_url, display_chain(*err));
    }
    if report.cancelled {
        bail!("cancelled after {} of {} item(s)", summary.succeeded + summary.skipped, report.len());
    }
    if summary.failed > 0 {
        bail!("{} of {} download(s) failed", summary.failed, report.len());
    }
    Ok(())
}
