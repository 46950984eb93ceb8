//! Batch Rotator
//!
//! Deterministically partitions a symbol universe into time-windowed batches
//! so repeated scans cover the whole universe without exceeding a per-cycle
//! request budget.

use std::time::Duration;

use chrono::Utc;

/// Length of one rotation window (2 minutes)
pub const ROTATION_PERIOD: Duration = Duration::from_secs(2 * 60);

/// Selects a contiguous, wrapped slice of the universe per rotation window
#[derive(Debug, Clone)]
pub struct BatchRotator {
    universe: Vec<String>,
    batch_size: usize,
    rotation_period: Duration,
}

impl BatchRotator {
    pub fn new(universe: Vec<String>, batch_size: usize) -> Self {
        Self {
            universe,
            batch_size,
            rotation_period: ROTATION_PERIOD,
        }
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Batch for the current wall-clock window
    pub fn select_batch(&self, cycle_offset: u64) -> Vec<String> {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        self.select_batch_at(now_ms, cycle_offset)
    }

    /// Batch for the window containing `now_ms`.
    ///
    /// `cycle_offset` shifts to a later window so one scan can pull several
    /// distinct batches inside the same wall-clock window.
    pub fn select_batch_at(&self, now_ms: u64, cycle_offset: u64) -> Vec<String> {
        let len = self.universe.len();
        if len == 0 || self.batch_size == 0 {
            return Vec::new();
        }

        let size = self.batch_size.min(len);
        let period_ms = (self.rotation_period.as_millis() as u64).max(1);
        let rotation_index = now_ms / period_ms + cycle_offset;

        // Reduce before multiplying to stay clear of overflow
        let start = ((rotation_index % len as u64) * (self.batch_size as u64 % len as u64)
            % len as u64) as usize;

        self.universe
            .iter()
            .cycle()
            .skip(start)
            .take(size)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn universe(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("T{:02}", i)).collect()
    }

    const WINDOW_MS: u64 = 120_000;

    #[test]
    fn test_start_follows_rotation_index() {
        let rotator = BatchRotator::new(universe(10), 3);

        assert_eq!(rotator.select_batch_at(0, 0), vec!["T00", "T01", "T02"]);
        assert_eq!(rotator.select_batch_at(WINDOW_MS, 0), vec!["T03", "T04", "T05"]);
        // Same window, later offset
        assert_eq!(rotator.select_batch_at(0, 2), vec!["T06", "T07", "T08"]);
    }

    #[test]
    fn test_wraps_around_end_of_universe() {
        let rotator = BatchRotator::new(universe(10), 3);
        // rotation 3 -> start 9
        assert_eq!(rotator.select_batch_at(3 * WINDOW_MS, 0), vec!["T09", "T00", "T01"]);
    }

    #[test]
    fn test_same_window_is_stable() {
        let rotator = BatchRotator::new(universe(47), 12);
        let a = rotator.select_batch_at(5 * WINDOW_MS + 1, 0);
        let b = rotator.select_batch_at(6 * WINDOW_MS - 1, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_consecutive_windows_cover_universe() {
        for (n, b) in [(10, 3), (47, 12), (12, 12), (9, 3), (5, 2)] {
            let rotator = BatchRotator::new(universe(n), b);
            let windows = n.div_ceil(b) as u64;

            let mut seen: HashMap<String, usize> = HashMap::new();
            for w in 0..windows {
                for symbol in rotator.select_batch_at(w * WINDOW_MS, 0) {
                    *seen.entry(symbol).or_default() += 1;
                }
            }

            assert_eq!(seen.len(), n, "universe {} batch {} not fully covered", n, b);
            // Only the wrap at the boundary may repeat a symbol
            let repeats: usize = seen.values().map(|c| c - 1).sum();
            assert_eq!(repeats, windows as usize * b - n);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(BatchRotator::new(Vec::new(), 5).select_batch_at(0, 0).is_empty());
        assert!(BatchRotator::new(universe(5), 0).select_batch_at(0, 0).is_empty());

        let oversized = BatchRotator::new(universe(4), 10);
        let batch = oversized.select_batch_at(0, 0);
        assert_eq!(batch.len(), 4);
    }
}
