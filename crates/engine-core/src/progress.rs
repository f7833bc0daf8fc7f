use serde::Serialize;
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{debug, info};

/// Where a fetch currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressStage {
    Connecting,
    Counting,
    Fetching,
    Done,
    Failed,
}

impl ProgressStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStage::Connecting => "Connecting",
            ProgressStage::Counting => "Counting",
            ProgressStage::Fetching => "Fetching",
            ProgressStage::Done => "Done",
            ProgressStage::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressStage::Done | ProgressStage::Failed)
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives progress from a running fetch. Calls for one fetch arrive in
/// order from a single task: `stage(Connecting)`, `stage(Counting)`,
/// `stage(Fetching)`, `start`, any number of `advance`, `finish`, then
/// `stage(Done)`. A failure jumps straight to `stage(Failed)`.
pub trait ProgressReporter: Send + Sync {
    fn stage(&self, _table: &str, _stage: ProgressStage) {}

    /// The expected row count, from `COUNT(*)`.
    fn start(&self, table: &str, total_rows: u64);

    /// Rows received in the latest batch.
    fn advance(&self, rows: usize);

    fn finish(&self, rows_fetched: usize);
}

/// Writes progress to the `tracing` log. The running tally is shared, so
/// concurrent fetches through one reporter interleave their counts.
#[derive(Debug, Default)]
pub struct LogProgress {
    total: AtomicU64,
    done: AtomicU64,
}

impl ProgressReporter for LogProgress {
    fn stage(&self, table: &str, stage: ProgressStage) {
        debug!(table, %stage, "Fetch stage changed");
    }

    fn start(&self, table: &str, total_rows: u64) {
        self.total.store(total_rows, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
        info!("Querying {} rows from {}", total_rows, table);
    }

    fn advance(&self, rows: usize) {
        let done = self.done.fetch_add(rows as u64, Ordering::Relaxed) + rows as u64;
        debug!(
            "Received {} rows ({}/{})",
            rows,
            done,
            self.total.load(Ordering::Relaxed)
        );
    }

    fn finish(&self, rows_fetched: usize) {
        info!("Fetched {} rows", rows_fetched);
    }
}
