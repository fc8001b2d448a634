//! Frame renderer: turns the current monitor state into one text frame.
//!
//! Rendering is a pure function of its inputs. It performs no I/O; the caller
//! positions the cursor and writes the returned text.

use crate::monitor::constants::*;
use crate::monitor::plot::{palette_color, Legend, Plot, Series};
use crate::monitor::state::FrameState;
use crate::monitor::target::Target;
use std::fmt::Write as FmtWrite;

/// Order in which series are drawn on top of each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesOrder {
    /// Target order; later targets occlude earlier ones
    #[default]
    Fixed,
    /// Ascending current RTT, so the highest line ends up on top
    AlarmingOnTop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub plot_height: usize,
    pub order: SeriesOrder,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            plot_height: DEFAULT_PLOT_HEIGHT,
            order: SeriesOrder::Fixed,
        }
    }
}

/// Render one frame: header, graph (or waiting placeholder) and footer
pub fn render_frame(
    targets: &[Target],
    frame: &FrameState<'_>,
    terminal_width: usize,
    options: &RenderOptions,
) -> String {
    let mut out = String::new();

    out.push_str("Ping latency: ");
    for (i, target) in targets.iter().enumerate() {
        if i > 0 {
            out.push_str(" vs ");
        }
        let _ = write!(out, "{} ({})", target.address, target.role);
    }
    out.push_str("\n\n");

    let legends: Vec<String> = targets
        .iter()
        .zip(frame.latest)
        .map(|(target, rtt_ms)| format!("{}: {:02} ms", target.legend, rtt_ms))
        .collect();

    let can_plot =
        !frame.histories.is_empty() && frame.histories.iter().all(|history| !history.is_empty());

    if can_plot {
        let longest = frame.histories.iter().map(|h| h.len()).max().unwrap_or(0);
        let series_data: Vec<Vec<f64>> = frame.histories.iter().map(|h| h.to_series()).collect();

        let series: Vec<Series<'_>> = draw_order(frame.latest, series_data.len(), options.order)
            .into_iter()
            .map(|i| Series {
                data: &series_data[i],
                color: palette_color(i),
            })
            .collect();
        let legend_entries: Vec<Legend> = legends
            .iter()
            .enumerate()
            .map(|(i, text)| Legend {
                text: text.clone(),
                color: palette_color(i),
            })
            .collect();

        let graph = Plot::new()
            .width(plot_width(terminal_width, longest))
            .height(options.plot_height)
            .lower_bound(0.0)
            .upper_bound(plot_upper_bound(frame.running_max))
            .render(&series, &legend_entries);

        // erase leftovers of a wider previous frame when the scale shrinks
        out.push_str(&graph.replace('\n', &format!("{CLEAR_TO_END_OF_LINE}\n")));
    } else {
        out.push('\n');
        out.push_str(WAITING_PLACEHOLDER);
        out.push_str("\n\n");
        out.push_str(&legends.join("    "));
        out.push('\n');
    }

    out.push_str(CLEAR_TO_END_OF_LINE);
    out.push_str("\n\n");
    out.push_str(FOOTER);
    out.push('\n');

    out
}

/// Columns available to the data area.
///
/// Keeps room for the y-axis labels and stays one short of the sample count,
/// so the resampled series never needs more columns than it has segments.
pub fn plot_width(terminal_width: usize, longest_history: usize) -> usize {
    terminal_width
        .saturating_sub(Y_AXIS_RESERVED_COLUMNS)
        .min(longest_history.saturating_sub(1))
        .max(1)
}

/// Upper y bound: the running maximum plus 10% headroom (at least 1 ms)
pub fn plot_upper_bound(running_max: u64) -> f64 {
    let running_max = running_max as f64;
    running_max + (running_max * PLOT_PADDING_RATIO).max(MIN_PLOT_PADDING_MS)
}

/// Indices of the series in the order they are drawn
fn draw_order(latest: &[u64], count: usize, order: SeriesOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..count).collect();
    if order == SeriesOrder::AlarmingOnTop {
        // stable, so equal RTTs keep target order
        indices.sort_by_key(|&i| latest.get(i).copied().unwrap_or(0));
    }
    indices
}
