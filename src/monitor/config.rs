use crate::monitor::aggregator::LoopSettings;
use crate::monitor::constants::*;
use crate::monitor::error::{MonitorError, Result};
use crate::monitor::plot::PALETTE;
use crate::monitor::renderer::{RenderOptions, SeriesOrder};
use clap::Parser;
use std::time::Duration;
use tracing::debug;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Parser, Debug, Clone)]
#[command(name = "pingplot")]
#[command(about = "Live terminal graph of ping latency to your gateway and a public resolver")]
pub struct Config {
    /// Number of frames to render (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub frames: usize,

    /// Graph update interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Number of samples kept per target
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window: usize,

    /// Plot height in rows
    #[arg(long, default_value_t = DEFAULT_PLOT_HEIGHT)]
    pub height: usize,

    /// Gateway address (skips default gateway discovery)
    #[arg(long)]
    pub gateway: Option<String>,

    /// Second target to ping
    #[arg(long, default_value = DEFAULT_SECONDARY_TARGET)]
    pub target: String,

    /// Additional targets to ping (repeatable)
    #[arg(long = "extra-target")]
    pub extra_targets: Vec<String>,

    /// Draw the line with the highest current RTT on top
    #[arg(long)]
    pub alarming_on_top: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl Config {
    /// Returns the tick interval as a Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Total number of monitored targets, gateway included
    pub fn target_count(&self) -> usize {
        2 + self.extra_targets.len()
    }

    /// Targets after the gateway, in display order
    pub fn remote_targets(&self) -> Vec<String> {
        std::iter::once(self.target.clone())
            .chain(self.extra_targets.iter().cloned())
            .collect()
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            tick_interval: self.tick_interval(),
            max_frames: self.frames,
            window: self.window,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            plot_height: self.height,
            order: if self.alarming_on_top {
                SeriesOrder::AlarmingOnTop
            } else {
                SeriesOrder::Fixed
            },
        }
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        if self.interval_ms == 0 {
            return Err(MonitorError::Config("interval must be > 0".into()));
        }
        if self.window < 2 {
            return Err(MonitorError::Config("window must be >= 2".into()));
        }
        if self.height == 0 {
            return Err(MonitorError::Config("height must be > 0".into()));
        }
        if self.target_count() > PALETTE.len() {
            return Err(MonitorError::Config(format!(
                "at most {} targets are supported, got {}",
                PALETTE.len(),
                self.target_count()
            )));
        }
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(MonitorError::Config(format!(
                "log_level must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        debug!("Configuration validated successfully");
        Ok(())
    }
}
