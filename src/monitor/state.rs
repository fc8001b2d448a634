//! Per-target sample bookkeeping owned by the aggregation loop.

use crate::monitor::history::History;
use tracing::debug;

/// A single RTT measurement tagged with the index of the target it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub target: usize,
    pub rtt_ms: u64,
}

/// Largest RTT seen across all targets since start. Never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningMax(u64);

impl RunningMax {
    pub fn observe(&mut self, rtt_ms: u64) {
        self.0 = self.0.max(rtt_ms);
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Read-only snapshot handed to the renderer once per frame
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    pub histories: &'a [History],
    pub latest: &'a [u64],
    pub running_max: u64,
}

/// Mutable state of the aggregation loop
#[derive(Debug)]
pub struct MonitorState {
    histories: Vec<History>,
    latest: Vec<u64>,
    fresh: Vec<bool>,
    running_max: RunningMax,
    frames: usize,
}

impl MonitorState {
    pub fn new(targets: usize, window: usize) -> Self {
        Self {
            histories: vec![History::new(window); targets],
            latest: vec![0; targets],
            fresh: vec![false; targets],
            running_max: RunningMax::default(),
            frames: 0,
        }
    }

    /// Record a sample as its target's latest RTT.
    ///
    /// Returns true once every target has reported at least once.
    pub fn record(&mut self, sample: Sample) -> bool {
        let Some(latest) = self.latest.get_mut(sample.target) else {
            debug!(target_index = sample.target, "Sample for unknown target ignored");
            return self.all_reported();
        };
        *latest = sample.rtt_ms;
        self.fresh[sample.target] = true;
        self.running_max.observe(sample.rtt_ms);
        self.all_reported()
    }

    /// True when every target has produced at least one sample
    pub fn all_reported(&self) -> bool {
        self.fresh.iter().all(|&fresh| fresh)
    }

    /// Push every target's latest RTT into its history.
    ///
    /// Does nothing until all targets have reported, so histories always grow in
    /// lockstep. Returns whether the histories grew.
    pub fn advance(&mut self) -> bool {
        if !self.all_reported() {
            return false;
        }
        for (history, &rtt_ms) in self.histories.iter_mut().zip(&self.latest) {
            history.append(rtt_ms);
        }
        true
    }

    /// Count a rendered frame and return the new total
    pub fn note_frame(&mut self) -> usize {
        self.frames += 1;
        self.frames
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// True when a non-zero frame limit has been reached
    pub fn limit_reached(&self, max_frames: usize) -> bool {
        max_frames > 0 && self.frames >= max_frames
    }

    pub fn running_max(&self) -> u64 {
        self.running_max.get()
    }

    pub fn histories(&self) -> &[History] {
        &self.histories
    }

    pub fn snapshot(&self) -> FrameState<'_> {
        FrameState {
            histories: &self.histories,
            latest: &self.latest,
            running_max: self.running_max.get(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_running_max_is_non_decreasing(
            samples in proptest::collection::vec((0usize..3, 0u64..100_000), 1..200),
        ) {
            let mut state = MonitorState::new(3, 40);
            let mut seen = 0u64;
            for (target, rtt_ms) in samples {
                let before = state.running_max();
                state.record(Sample { target, rtt_ms });
                seen = seen.max(rtt_ms);
                prop_assert!(state.running_max() >= before);
                prop_assert!(state.running_max() >= seen);
            }
        }
    }
}
