use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    fetches_started: AtomicU64,
    fetches_failed: AtomicU64,
    rows_fetched: AtomicU64,
    batches_fetched: AtomicU64,
}

/// Running totals across every fetch made through one [`TableFetcher`].
/// Clones share the same counters.
///
/// [`TableFetcher`]: crate::fetcher::TableFetcher
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub fetches_started: u64,
    pub fetches_failed: u64,
    pub rows_fetched: u64,
    pub batches_fetched: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_fetches(&self) {
        self.inner.fetches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failures(&self) {
        self.inner.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self, rows: usize) {
        self.inner
            .rows_fetched
            .fetch_add(rows as u64, Ordering::Relaxed);
        self.inner.batches_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fetches_started: self.inner.fetches_started.load(Ordering::Relaxed),
            fetches_failed: self.inner.fetches_failed.load(Ordering::Relaxed),
            rows_fetched: self.inner.rows_fetched.load(Ordering::Relaxed),
            batches_fetched: self.inner.batches_fetched.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
