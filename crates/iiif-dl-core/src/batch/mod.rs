//! Bounded-concurrency batch download engine.
//!
//! A fixed pool of `concurrency` worker threads pulls `DownloadTask`s from a
//! shared queue. Each task is skipped when its destination already exists,
//! otherwise fetched and written atomically. Every task yields exactly one
//! `DownloadOutcome`; a failing task never stops its siblings.

mod report;
mod run;

pub use report::{BatchReport, BatchSummary, ItemOutcome};
pub use run::{run_batch, EngineOptions};

use std::fmt;
use std::path::PathBuf;

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR};
use crate::error::ItemError;

/// One image to download. Built by the planner, consumed once by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub source_url: String,
    pub destination: PathBuf,
    /// 1-based position in the input list.
    pub sequence_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyExists => write!(f, "already exists"),
        }
    }
}

/// Result of one task.
#[derive(Debug)]
pub enum DownloadOutcome {
    Success(PathBuf),
    Skipped(SkipReason),
    Failed(ItemError),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DownloadOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DownloadOutcome::Failed(_))
    }
}

/// Per-invocation settings. Read-only for the duration of a run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    /// Maximum downloads in flight; values below 1 are treated as 1.
    pub concurrency: usize,
    /// Name files `001.jpg`, `002.jpg`, ... instead of after the source.
    pub rename_sequentially: bool,
    /// Reverse the URL list before numbering.
    pub reverse_order: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            rename_sequentially: false,
            reverse_order: false,
        }
    }
}

/// Completion notice sent to an optional progress channel, one per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemProgress {
    pub sequence_index: usize,
    pub source_url: String,
    /// Tasks finished so far, this one included.
    pub completed: usize,
    pub total: usize,
    pub status: ProgressStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressStatus {
    Saved(PathBuf),
    Skipped(PathBuf),
    Failed(String),
}

impl fmt::Display for ItemProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.total.to_string().len();
        write!(f, "[{:>width$}/{}] ", self.completed, self.total, width = width)?;
        match &self.status {
            ProgressStatus::Saved(path) => write!(f, "{}", path.display()),
            ProgressStatus::Skipped(path) => write!(f, "{} (already exists)", path.display()),
            ProgressStatus::Failed(detail) => write!(f, "FAILED {}: {}", self.source_url, detail),
        }
    }
}
