//! Fixed-capacity ring buffer with rolling statistics

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct HistoryWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl HistoryWindow {
    /// A zero capacity is bumped to 1 so `push` always keeps the latest value
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest sample when full
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn sample_count(&self) -> usize {
        self.values.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// `None` below two samples (insufficient data)
    pub fn mean(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Population standard deviation; `None` below two samples
    pub fn stddev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let n = self.values.len() as f64;
        let variance = self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt())
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats {
            sample_count: self.sample_count(),
            capacity: self.capacity,
            mean: self.mean(),
            stddev: self.stddev(),
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Point-in-time view of a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub sample_count: usize,
    pub capacity: usize,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
}
