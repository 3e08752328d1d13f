//! Worker pool over a shared task queue.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};

use super::report::{BatchReport, ItemOutcome};
use super::{DownloadOutcome, DownloadTask, ItemProgress, ProgressStatus, SkipReason};
use crate::control::CancelToken;
use crate::error::{display_chain, ItemError};
use crate::fetcher::Fetcher;
use crate::retry::{fetch_with_retry, RetryPolicy};
use crate::storage;

/// How a batch is executed.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum tasks in flight; values below 1 are treated as 1.
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub cancel: CancelToken,
    /// Receives one `ItemProgress` per finished task.
    pub progress: Option<mpsc::Sender<ItemProgress>>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            concurrency: crate::config::DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            cancel: CancelToken::new(),
            progress: None,
        }
    }
}

/// Runs every task with at most `opts.concurrency` in flight and returns one
/// outcome per task, in completion order.
///
/// Workers stop pulling new tasks once `opts.cancel` is set; tasks still
/// queued at that point are reported as `Failed(ItemError::Cancelled)`.
pub fn run_batch(tasks: Vec<DownloadTask>, fetcher: &dyn Fetcher, opts: &EngineOptions) -> BatchReport {
    let total = tasks.len();
    let mut report = BatchReport {
        outcomes: Vec::with_capacity(total),
        cancelled: false,
    };
    if total == 0 {
        return report;
    }

    let num_workers = opts.concurrency.max(1).min(total);
    tracing::info!(tasks = total, workers = num_workers, "batch started");

    let work: Mutex<VecDeque<DownloadTask>> = Mutex::new(tasks.into_iter().collect());
    let (tx, rx) = mpsc::channel::<ItemOutcome>();

    std::thread::scope(|scope| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            scope.spawn(move || loop {
                if opts.cancel.is_cancelled() {
                    break;
                }
                let next = work.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
                let Some(task) = next else {
                    break;
                };
                let outcome = process_task(&task, fetcher, &opts.retry, &opts.cancel);
                if tx.send(ItemOutcome { task, outcome }).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for item in rx {
            record(&mut report, item, total, opts);
        }
    });

    let leftover: Vec<DownloadTask> = work
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .collect();
    if !leftover.is_empty() || opts.cancel.is_cancelled() {
        report.cancelled = true;
        tracing::warn!(not_started = leftover.len(), "batch cancelled");
    }
    for task in leftover {
        let item = ItemOutcome {
            task,
            outcome: DownloadOutcome::Failed(ItemError::Cancelled),
        };
        record(&mut report, item, total, opts);
    }

    let summary = report.summary();
    tracing::info!(
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        "batch finished"
    );
    report
}

/// Skip, or fetch and write, a single task.
fn process_task(
    task: &DownloadTask,
    fetcher: &dyn Fetcher,
    retry: &RetryPolicy,
    cancel: &CancelToken,
) -> DownloadOutcome {
    if task.destination.exists() {
        return DownloadOutcome::Skipped(SkipReason::AlreadyExists);
    }

    let bytes = match fetch_with_retry(fetcher, &task.source_url, retry, cancel) {
        Ok(bytes) => bytes,
        Err(e) => return DownloadOutcome::Failed(e.into()),
    };
    if cancel.is_cancelled() {
        return DownloadOutcome::Failed(ItemError::Cancelled);
    }

    match storage::write_atomic(&task.destination, &bytes) {
        Ok(()) => DownloadOutcome::Success(task.destination.clone()),
        Err(e) => DownloadOutcome::Failed(e.into()),
    }
}

fn record(report: &mut BatchReport, item: ItemOutcome, total: usize, opts: &EngineOptions) {
    let task = &item.task;
    let status = match &item.outcome {
        DownloadOutcome::Success(path) => {
            tracing::info!(index = task.sequence_index, path = %path.display(), "saved");
            ProgressStatus::Saved(path.clone())
        }
        DownloadOutcome::Skipped(reason) => {
            tracing::debug!(index = task.sequence_index, path = %task.destination.display(), %reason, "skipped");
            ProgressStatus::Skipped(task.destination.clone())
        }
        DownloadOutcome::Failed(e) => {
            let detail = display_chain(e);
            tracing::warn!(index = task.sequence_index, url = %task.source_url, error = %detail, "failed");
            ProgressStatus::Failed(detail)
        }
    };
    if let Some(progress) = &opts.progress {
        let _ = progress.send(ItemProgress {
            sequence_index: task.sequence_index,
            source_url: task.source_url.clone(),
            completed: report.outcomes.len() + 1,
            total,
            status,
        });
    }
    report.outcomes.push(item);
}
