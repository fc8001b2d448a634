//! Aggregation loop
//!
//! Joins every sample source, a periodic tick and the cancellation signal into a
//! single consumer. All monitor state is owned by this loop and touched by one
//! logical thread of control, so none of it needs locking.
//!
//! Each source is drained by its own forwarding task that tags samples with the
//! target index and pushes them into one shared queue. The loop then only waits
//! on a fixed set of three things: cancellation, the ticker and that queue. The
//! queue closes once every forwarder is gone, which is how the loop learns that
//! all sources have finished.

use crate::monitor::constants::*;
use crate::monitor::display::DisplaySink;
use crate::monitor::error::{MonitorError, Result};
use crate::monitor::renderer::{render_frame, RenderOptions};
use crate::monitor::source::SampleSource;
use crate::monitor::state::{MonitorState, Sample};
use crate::monitor::target::Target;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Runtime parameters of the aggregation loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSettings {
    /// Interval between history updates
    pub tick_interval: Duration,
    /// Stop after this many rendered frames (0 = unlimited)
    pub max_frames: usize,
    /// Samples kept per target
    pub window: usize,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            max_frames: 0,
            window: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    FrameLimit,
    Cancelled,
    SourcesClosed,
}

/// Outcome of a completed loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: usize,
    pub reason: StopReason,
}

/// Run the monitor until cancelled, the frame limit is reached or every source closes.
///
/// All sources are started before anything is drawn; the first one that fails
/// aborts the loop with an error naming its target. Each source receives a
/// child of `cancel`, which is fired on every exit path. A failed write to
/// `display` aborts the loop with that error.
pub async fn run_loop<D>(
    cancel: &CancellationToken,
    display: &mut D,
    sources: &[Box<dyn SampleSource>],
    settings: &LoopSettings,
    options: &RenderOptions,
) -> Result<LoopSummary>
where
    D: DisplaySink + ?Sized,
{
    let sources_token = cancel.child_token();
    let _stop_sources = sources_token.clone().drop_guard();

    let mut targets = Vec::with_capacity(sources.len());
    let mut streams = Vec::with_capacity(sources.len());
    for (position, source) in sources.iter().enumerate() {
        let address = source.address().to_string();
        let stream = source.start(sources_token.clone()).map_err(|e| {
            error!(addr = %address, error = %e, "Failed to start sample source");
            MonitorError::SourceStart {
                target: address.clone(),
                source: Box::new(e),
            }
        })?;
        info!(addr = %address, "Sample source started");
        targets.push(Target::for_position(address, position));
        streams.push(stream);
    }

    let (samples_tx, mut samples_rx) = mpsc::channel(streams.len().max(1));
    for (index, stream) in streams.into_iter().enumerate() {
        tokio::spawn(forward_samples(
            index,
            targets[index].address.clone(),
            stream,
            samples_tx.clone(),
            sources_token.clone(),
        ));
    }
    // only the forwarders may keep the queue open
    drop(samples_tx);

    display.clear()?;
    display.flush()?;

    let mut state = MonitorState::new(targets.len(), settings.window);
    let period = settings.tick_interval.max(Duration::from_millis(1));
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let reason = loop {
        if state.limit_reached(settings.max_frames) {
            break StopReason::FrameLimit;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break StopReason::Cancelled,
            _ = ticker.tick() => {
                if state.advance() {
                    draw(&mut *display, &targets, &mut state, options)?;
                }
            }
            sample = samples_rx.recv() => match sample {
                Some(sample) => {
                    if state.record(sample) {
                        draw(&mut *display, &targets, &mut state, options)?;
                    }
                }
                None => break StopReason::SourcesClosed,
            }
        }
    };

    sources_token.cancel();
    info!(frames = state.frames(), reason = ?reason, "Monitor loop stopped");

    Ok(LoopSummary {
        frames: state.frames(),
        reason,
    })
}

fn draw<D>(
    display: &mut D,
    targets: &[Target],
    state: &mut MonitorState,
    options: &RenderOptions,
) -> Result<()>
where
    D: DisplaySink + ?Sized,
{
    let text = render_frame(targets, &state.snapshot(), display.width(), options);

    display.move_cursor(1, 1)?;
    display.write(&text)?;
    display.write(CLEAR_TO_END_OF_SCREEN)?;
    display.flush()?;

    let frame = state.note_frame();
    debug!(
        frame = frame,
        running_max_ms = state.running_max(),
        "Frame rendered"
    );
    Ok(())
}

async fn forward_samples(
    index: usize,
    address: String,
    mut stream: mpsc::Receiver<u64>,
    samples: mpsc::Sender<Sample>,
    cancel: CancellationToken,
) {
    loop {
        let rtt_ms = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = stream.recv() => match next {
                Some(rtt_ms) => rtt_ms,
                None => {
                    info!(addr = %address, "Sample source closed");
                    break;
                }
            },
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = samples.send(Sample { target: index, rtt_ms }) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
    debug!(addr = %address, "Sample forwarder stopped");
}
