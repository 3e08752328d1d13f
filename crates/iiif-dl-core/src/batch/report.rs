//! Aggregated batch results.

use std::fmt;

use super::{DownloadOutcome, DownloadTask};
use crate::error::ItemError;

/// A task together with what happened to it.
#[derive(Debug)]
pub struct ItemOutcome {
    pub task: DownloadTask,
    pub outcome: DownloadOutcome,
}

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} skipped, {} failed ({} total)",
            self.succeeded,
            self.skipped,
            self.failed,
            self.total()
        )
    }
}

/// One outcome per input task, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for item in &self.outcomes {
            match item.outcome {
                DownloadOutcome::Success(_) => summary.succeeded += 1,
                DownloadOutcome::Skipped(_) => summary.skipped += 1,
                DownloadOutcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn succeeded(&self) -> usize {
        self.summary().succeeded
    }

    pub fn skipped(&self) -> usize {
        self.summary().skipped
    }

    pub fn failed(&self) -> usize {
        self.summary().failed
    }

    /// True when nothing failed (skips count as success).
    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.failed() == 0
    }

    /// Outcomes re-sorted by `sequence_index`.
    pub fn in_task_order(&self) -> Vec<&ItemOutcome> {
        let mut ordered: Vec<&ItemOutcome> = self.outcomes.iter().collect();
        ordered.sort_by_key(|item| item.task.sequence_index);
        ordered
    }

    /// Failed tasks with their errors, in task order.
    pub fn failures(&self) -> Vec<(&DownloadTask, &ItemError)> {
        self.in_task_order()
            .into_iter()
            .filter_map(|item| match &item.outcome {
                DownloadOutcome::Failed(e) => Some((&item.task, e)),
                _ => None,
            })
            .collect()
    }
}
