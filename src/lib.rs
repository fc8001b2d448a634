//! pingplot - live terminal latency graph
//!
//! This library continuously probes a small set of network targets (typically the
//! local gateway and a public resolver), keeps a sliding window of round-trip times
//! per target, and renders a scrolling multi-series graph into the terminal.

pub mod monitor;
pub mod probe;
