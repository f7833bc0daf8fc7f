//! Chunk sizing for adaptive fetches.
//!
//! After every non-empty batch the next chunk is halved if the round trip
//! took longer than the latency threshold and doubled otherwise. The size
//! stays within `1..=max(total_rows, 1)`.

use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_LATENCY_THRESHOLD: Duration = Duration::from_secs(1);

/// Keeps a zero-duration batch from dividing by zero.
const THROUGHPUT_EPSILON_SECS: f64 = 0.001;

/// One measured round trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChunkSample {
    /// The size that was requested, not the number of rows returned.
    pub chunk_size: usize,
    pub elapsed: Duration,
}

impl ChunkSample {
    /// Requested rows per second.
    pub fn throughput(&self) -> f64 {
        self.chunk_size as f64 / (self.elapsed.as_secs_f64() + THROUGHPUT_EPSILON_SECS)
    }
}

#[derive(Debug, Clone)]
pub struct ChunkTuner {
    current: usize,
    ceiling: usize,
    threshold: Duration,
    samples: Vec<ChunkSample>,
}

impl ChunkTuner {
    pub fn new(initial: usize, total_rows: u64, threshold: Duration) -> Self {
        let ceiling = usize::try_from(total_rows).unwrap_or(usize::MAX).max(1);
        ChunkTuner {
            current: initial.clamp(1, ceiling),
            ceiling,
            threshold,
            samples: Vec::new(),
        }
    }

    /// The size to request next.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Records how long the last batch took and returns the next size.
    pub fn observe(&mut self, elapsed: Duration) -> usize {
        self.samples.push(ChunkSample {
            chunk_size: self.current,
            elapsed,
        });

        self.current = if elapsed > self.threshold {
            (self.current / 2).max(1)
        } else {
            self.current.saturating_mul(2).min(self.ceiling)
        };
        self.current
    }

    /// The sampled size with the best throughput; the earliest one wins a tie.
    pub fn optimal_chunk_size(&self) -> Option<usize> {
        let mut best: Option<&ChunkSample> = None;
        for sample in &self.samples {
            if best.is_none_or(|b| sample.throughput() > b.throughput()) {
                best = Some(sample);
            }
        }
        best.map(|sample| sample.chunk_size)
    }

    pub fn into_samples(self) -> Vec<ChunkSample> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Duration = Duration::from_millis(1);
    const SLOW: Duration = Duration::from_secs(2);

    #[test]
    fn doubles_up_to_total_rows() {
        let mut tuner = ChunkTuner::new(3, 20, DEFAULT_LATENCY_THRESHOLD);
        let sizes: Vec<_> = (0..4).map(|_| tuner.observe(FAST)).collect();
        assert_eq!(sizes, vec![6, 12, 20, 20]);
    }

    #[test]
    fn halves_down_to_one() {
        let mut tuner = ChunkTuner::new(5, 1000, DEFAULT_LATENCY_THRESHOLD);
        let sizes: Vec<_> = (0..4).map(|_| tuner.observe(SLOW)).collect();
        assert_eq!(sizes, vec![2, 1, 1, 1]);
    }

    #[test]
    fn exactly_at_threshold_counts_as_fast() {
        let mut tuner = ChunkTuner::new(4, 100, DEFAULT_LATENCY_THRESHOLD);
        assert_eq!(tuner.observe(DEFAULT_LATENCY_THRESHOLD), 8);
    }

    #[test]
    fn initial_size_is_clamped() {
        assert_eq!(ChunkTuner::new(500, 10, FAST).current(), 10);
        assert_eq!(ChunkTuner::new(0, 10, FAST).current(), 1);
        // an empty table still asks for one row
        assert_eq!(ChunkTuner::new(100, 0, FAST).current(), 1);
    }

    #[test]
    fn optimal_size_uses_best_throughput() {
        let mut tuner = ChunkTuner::new(10, 1000, DEFAULT_LATENCY_THRESHOLD);
        tuner.observe(Duration::from_millis(100)); // 10 rows, ~99/s
        tuner.observe(Duration::from_millis(50)); // 20 rows, ~392/s
        tuner.observe(SLOW); // 40 rows, ~20/s
        tuner.observe(Duration::from_millis(10)); // 20 rows, ~1818/s

        assert_eq!(tuner.optimal_chunk_size(), Some(20));
        let sizes: Vec<_> = tuner.into_samples().iter().map(|s| s.chunk_size).collect();
        assert_eq!(sizes, vec![10, 20, 40, 20]);
    }

    #[test]
    fn slow_large_batch_loses_to_fast_small_one() {
        let mut tuner = ChunkTuner::new(64, 1000, DEFAULT_LATENCY_THRESHOLD);
        tuner.observe(SLOW); // 64 rows, ~32/s
        tuner.observe(FAST); // 32 rows, ~16000/s
        assert_eq!(tuner.optimal_chunk_size(), Some(32));
    }

    #[test]
    fn no_samples_no_optimum() {
        let tuner = ChunkTuner::new(8, 1000, DEFAULT_LATENCY_THRESHOLD);
        assert_eq!(tuner.optimal_chunk_size(), None);
    }
}
