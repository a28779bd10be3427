//! Rolling history for the per-metric charts.

use std::collections::VecDeque;

use super::metric::{MetricKey, PerMetric};

/// Default number of points kept per metric.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Largest configurable number of points per metric.
pub const MAX_HISTORY_DEPTH: usize = 1_000;

/// Fixed-capacity rolling window of recent values for every metric.
///
/// Each window always holds exactly `capacity` values, oldest first. It starts
/// filled with zeros and every push evicts the oldest value.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    windows: PerMetric<VecDeque<f64>>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryBuffer {
    /// Create a buffer holding `capacity` zeros per metric.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            windows: PerMetric::from_fn(|_| std::iter::repeat(0.0).take(capacity).collect()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop the oldest value for `key` and append `value`.
    pub fn push(&mut self, key: MetricKey, value: f64) {
        let window = &mut self.windows[key];
        window.pop_front();
        window.push_back(value);
    }

    /// Values for `key`, oldest first.
    pub fn snapshot(&self, key: MetricKey) -> Vec<f64> {
        self.windows[key].iter().copied().collect()
    }

    /// Most recent value for `key`.
    pub fn latest(&self, key: MetricKey) -> f64 {
        self.windows[key].back().copied().unwrap_or(0.0)
    }
}
