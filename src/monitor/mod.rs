//! Monitor module: sliding windows, frame rendering and the aggregation loop

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod history;
pub mod logging;
pub mod plot;
pub mod renderer;
pub mod source;
pub mod state;
pub mod target;

pub use aggregator::{run_loop, LoopSettings, LoopSummary, StopReason};
pub use config::Config;
pub use constants::*;
pub use display::{CursorGuard, DisplaySink, TerminalDisplay};
pub use error::{MonitorError, Result};
pub use history::History;
pub use logging::init_logging_with_config;
pub use plot::{palette_color, Legend, Plot, Series, PALETTE};
pub use renderer::{plot_upper_bound, plot_width, render_frame, RenderOptions, SeriesOrder};
pub use source::SampleSource;
pub use state::{FrameState, MonitorState, RunningMax, Sample};
pub use target::Target;
