//! Constants used throughout the monitor

/// Number of most recent samples kept per target
pub const DEFAULT_WINDOW_SIZE: usize = 40;

/// Plot height in rows
pub const DEFAULT_PLOT_HEIGHT: usize = 10;

/// Tick interval in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Second target probed next to the gateway
pub const DEFAULT_SECONDARY_TARGET: &str = "1.1.1.1";

/// Columns reserved for y-axis labels
pub const Y_AXIS_RESERVED_COLUMNS: usize = 10;

/// Headroom above the running maximum, as a fraction of it
pub const PLOT_PADDING_RATIO: f64 = 0.1;

/// Smallest headroom above the running maximum, in milliseconds
pub const MIN_PLOT_PADDING_MS: f64 = 1.0;

/// Terminal width assumed when the real one cannot be queried
pub const FALLBACK_TERMINAL_WIDTH: usize = 80;

/// Each source hands over one sample at a time
pub const SOURCE_CHANNEL_CAPACITY: usize = 1;

/// Clear from the cursor to the end of the line
pub const CLEAR_TO_END_OF_LINE: &str = "\x1b[K";

/// Clear from the cursor to the end of the screen
pub const CLEAR_TO_END_OF_SCREEN: &str = "\x1b[J";

pub const WAITING_PLACEHOLDER: &str = "   [ Waiting for more data... ]";

pub const FOOTER: &str = "Press Control-C to exit";
