//! Sliding window of recent RTT samples for one target.

use std::collections::VecDeque;

/// Bounded, insertion-ordered history of RTT samples in milliseconds.
///
/// Holds at most `window` samples. Appending to a full history evicts the
/// oldest sample first, so the contents are always the most recent inputs in
/// arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    samples: VecDeque<u64>,
    window: usize,
}

impl History {
    /// Create an empty history holding up to `window` samples (at least one)
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Append a sample, dropping from the front when the window is full
    pub fn append(&mut self, rtt_ms: u64) {
        self.samples.push_back(rtt_ms);
        while self.samples.len() > self.window {
            self.samples.pop_front();
        }
    }

    /// Consuming form of [`History::append`]
    #[must_use]
    pub fn appended(mut self, rtt_ms: u64) -> Self {
        self.append(rtt_ms);
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn latest(&self) -> Option<u64> {
        self.samples.back().copied()
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().copied()
    }

    /// Samples as plot coordinates, oldest first
    pub fn to_series(&self) -> Vec<f64> {
        self.samples.iter().map(|&rtt| rtt as f64).collect()
    }
}
