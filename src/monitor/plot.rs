//! Multi-series ASCII line plot.
//!
//! Draws any number of series into one shared coordinate system using box
//! drawing characters, with a labelled y-axis on the left and an optional legend
//! line underneath. Series drawn later overwrite earlier ones where they meet.

use colored::{Color, Colorize};
use std::fmt::Write as FmtWrite;

/// Series colors, assigned by target position and cycled when exhausted
pub const PALETTE: [Color; 5] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Red,
    Color::Green,
];

/// Spaces between legend entries
const LEGEND_SPACING: usize = 3;

/// Color for the series at position `index`
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// One line to draw
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    pub data: &'a [f64],
    pub color: Color,
}

/// One legend entry
#[derive(Debug, Clone)]
pub struct Legend {
    pub text: String,
    pub color: Color,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    glyph: char,
    color: Option<Color>,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: None,
    };

    fn render(self, out: &mut String) {
        match self.color {
            Some(color) => {
                let _ = write!(out, "{}", self.glyph.to_string().color(color));
            }
            None => out.push(self.glyph),
        }
    }
}

/// Plot configuration
#[derive(Debug, Clone)]
pub struct Plot {
    width: usize,
    height: usize,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    precision: usize,
}

impl Default for Plot {
    fn default() -> Self {
        Self::new()
    }
}

impl Plot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 10,
            lower_bound: None,
            upper_bound: None,
            precision: 2,
        }
    }

    /// Number of points each series is resampled to (0 keeps the data as is)
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Height in rows above the baseline
    #[must_use]
    pub fn height(mut self, height: usize) -> Self {
        self.height = height.max(1);
        self
    }

    /// Extend the y range down to at least `bound`
    #[must_use]
    pub fn lower_bound(mut self, bound: f64) -> Self {
        self.lower_bound = Some(bound);
        self
    }

    /// Extend the y range up to at least `bound`
    #[must_use]
    pub fn upper_bound(mut self, bound: f64) -> Self {
        self.upper_bound = Some(bound);
        self
    }

    /// Draw `series` in the given order, followed by `legends`.
    ///
    /// Returns an empty string when there is nothing to plot. Lines are joined
    /// with `\n` and carry no trailing newline.
    pub fn render(&self, series: &[Series<'_>], legends: &[Legend]) -> String {
        let data: Vec<(Vec<f64>, Color)> = series
            .iter()
            .filter(|s| !s.data.is_empty())
            .map(|s| (resample(s.data, self.width), s.color))
            .collect();
        if data.is_empty() {
            return String::new();
        }

        let (mut minimum, mut maximum) = data
            .iter()
            .flat_map(|(points, _)| points.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if let Some(lower) = self.lower_bound {
            minimum = minimum.min(lower);
        }
        if let Some(upper) = self.upper_bound {
            maximum = maximum.max(upper);
        }

        let interval = (maximum - minimum).abs();
        let ratio = if interval > 0.0 {
            self.height as f64 / interval
        } else {
            1.0
        };
        let min_row = (minimum * ratio).round() as i64;
        let max_row = (maximum * ratio).round() as i64;
        let rows = (max_row - min_row).unsigned_abs() as usize;
        let columns = data.iter().map(|(points, _)| points.len()).max().unwrap_or(0);

        let precision = self.label_precision(minimum, maximum);
        let label_width = format!("{:.*}", precision, maximum)
            .len()
            .max(format!("{:.*}", precision, minimum).len());

        let mut axis = vec![Cell { glyph: '┤', color: None }; rows + 1];
        let mut grid = vec![vec![Cell::BLANK; columns]; rows + 1];

        let to_row = |value: f64| -> usize {
            let y = ((value * ratio).round() as i64 - min_row).clamp(0, rows as i64) as usize;
            rows - y
        };

        for (points, color) in &data {
            let color = Some(*color);
            axis[to_row(points[0])] = Cell { glyph: '┼', color };

            for (x, pair) in points.windows(2).enumerate() {
                let (r0, r1) = (to_row(pair[0]), to_row(pair[1]));
                if r0 == r1 {
                    grid[r0][x] = Cell { glyph: '─', color };
                    continue;
                }
                // rows grow downwards, so a smaller row index is a higher value
                if r0 < r1 {
                    grid[r1][x] = Cell { glyph: '╰', color };
                    grid[r0][x] = Cell { glyph: '╮', color };
                } else {
                    grid[r1][x] = Cell { glyph: '╭', color };
                    grid[r0][x] = Cell { glyph: '╯', color };
                }
                for row in grid.iter_mut().take(r0.max(r1)).skip(r0.min(r1) + 1) {
                    row[x] = Cell { glyph: '│', color };
                }
            }
        }

        let mut lines = Vec::with_capacity(rows + 3);
        for (row, cells) in grid.iter().enumerate() {
            let magnitude = if rows > 0 {
                maximum - row as f64 * interval / rows as f64
            } else {
                maximum
            };
            let mut line = format!("{:>width$.prec$} ", magnitude, width = label_width + 1, prec = precision);
            axis[row].render(&mut line);
            for cell in cells {
                cell.render(&mut line);
            }
            lines.push(line.trim_end().to_string());
        }

        if !legends.is_empty() {
            lines.push(String::new());
            lines.push(render_legends(legends, label_width + 3, columns));
        }

        lines.join("\n")
    }

    fn label_precision(&self, minimum: f64, maximum: f64) -> usize {
        let magnitude = maximum.abs().max(minimum.abs());
        let log = if magnitude == 0.0 { -1.0 } else { magnitude.log10() };

        if log < 0.0 {
            if log.fract() != 0.0 {
                self.precision + log.abs() as usize
            } else {
                self.precision + (log.abs() - 1.0) as usize
            }
        } else if log > 2.0 {
            0
        } else {
            self.precision
        }
    }
}

fn render_legends(legends: &[Legend], left_pad: usize, plot_width: usize) -> String {
    let visible_len: usize = legends
        .iter()
        .map(|legend| legend.text.chars().count() + 2)
        .sum::<usize>()
        + LEGEND_SPACING * legends.len().saturating_sub(1);

    let mut line = " ".repeat(left_pad);
    if visible_len < plot_width {
        line.push_str(&" ".repeat((plot_width - visible_len) / 2));
    }
    for (i, legend) in legends.iter().enumerate() {
        if i > 0 {
            line.push_str(&" ".repeat(LEGEND_SPACING));
        }
        let _ = write!(line, "{} {}", "■".color(legend.color), legend.text);
    }
    line
}

/// Linearly resample `data` to exactly `count` points, keeping both endpoints.
///
/// A `count` of 0 leaves the data untouched; a `count` of 1 keeps just the endpoints.
pub fn resample(data: &[f64], count: usize) -> Vec<f64> {
    if count == 0 || data.len() <= 1 {
        return data.to_vec();
    }
    if count < 2 {
        return vec![data[0], data[data.len() - 1]];
    }

    let step = (data.len() - 1) as f64 / (count - 1) as f64;
    let mut out = Vec::with_capacity(count);
    out.push(data[0]);
    for i in 1..count - 1 {
        let position = i as f64 * step;
        let before = position.floor();
        let after = position.ceil();
        let fraction = position - before;
        let (a, b) = (data[before as usize], data[after as usize]);
        out.push(a + (b - a) * fraction);
    }
    out.push(data[data.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(plot: &Plot, data: &[&[f64]]) -> String {
        colored::control::set_override(false);
        let series: Vec<Series<'_>> = data
            .iter()
            .enumerate()
            .map(|(i, points)| Series {
                data: points,
                color: palette_color(i),
            })
            .collect();
        plot.render(&series, &[])
    }

    #[test]
    fn test_resample_keeps_endpoints() {
        let out = resample(&[0.0, 10.0], 5);
        assert_eq!(out, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_resample_shrinks() {
        let out = resample(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_resample_degenerate_counts() {
        assert_eq!(resample(&[4.0], 8), vec![4.0]);
        assert_eq!(resample(&[1.0, 2.0, 3.0], 1), vec![1.0, 3.0]);
        assert_eq!(resample(&[1.0, 2.0, 3.0], 0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_flat_line() {
        let plot = Plot::new().height(2).lower_bound(0.0).upper_bound(2.0);
        let out = plain(&plot, &[&[2.0, 2.0, 2.0]]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], " 2.00 ┼──");
        assert_eq!(lines[1], " 1.00 ┤");
        assert_eq!(lines[2], " 0.00 ┤");
    }

    #[test]
    fn test_rising_line() {
        let plot = Plot::new().height(2).lower_bound(0.0).upper_bound(2.0);
        let out = plain(&plot, &[&[0.0, 2.0]]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 2.00 ┤╭");
        assert_eq!(lines[1], " 1.00 ┤│");
        assert_eq!(lines[2], " 0.00 ┼╯");
    }

    #[test]
    fn test_falling_line() {
        let plot = Plot::new().height(2).lower_bound(0.0).upper_bound(2.0);
        let out = plain(&plot, &[&[2.0, 0.0]]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 2.00 ┼╮");
        assert_eq!(lines[1], " 1.00 ┤│");
        assert_eq!(lines[2], " 0.00 ┤╰");
    }

    #[test]
    fn test_later_series_overwrites_earlier() {
        let plot = Plot::new().height(2).lower_bound(0.0).upper_bound(2.0);
        let out = plain(&plot, &[&[2.0, 2.0], &[2.0, 0.0]]);
        assert_eq!(out.lines().next(), Some(" 2.00 ┼╮"));
    }

    #[test]
    fn test_large_values_drop_decimals() {
        let plot = Plot::new().height(2).lower_bound(0.0).upper_bound(110.0);
        let out = plain(&plot, &[&[100.0]]);
        assert!(out.lines().next().unwrap_or("").starts_with(" 110 "));
        assert!(out.lines().last().unwrap_or("").starts_with("   0 ┤"));
    }

    #[test]
    fn test_legend_line() {
        colored::control::set_override(false);
        let data = [1.0, 1.0];
        let out = Plot::new().render(
            &[Series { data: &data, color: Color::Cyan }],
            &[
                Legend { text: "A: 01 ms".into(), color: Color::Cyan },
                Legend { text: "B: 02 ms".into(), color: Color::Magenta },
            ],
        );
        let last = out.lines().last().unwrap_or("");
        assert!(last.contains("■ A: 01 ms   ■ B: 02 ms"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Plot::new().render(&[], &[]), "");
    }
}
