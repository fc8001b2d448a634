use crate::monitor::constants::FALLBACK_TERMINAL_WIDTH;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use tracing::{debug, warn};

/// Trait for the terminal the monitor draws into
pub trait DisplaySink {
    /// Clear the whole screen
    fn clear(&mut self) -> io::Result<()>;

    /// Move the cursor to a 1-based column and row
    fn move_cursor(&mut self, column: u16, row: u16) -> io::Result<()>;

    /// Write text at the cursor position
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Flush buffered output to the terminal
    fn flush(&mut self) -> io::Result<()>;

    /// Current terminal width in columns
    fn width(&self) -> usize;
}

/// crossterm-backed implementation of DisplaySink
#[derive(Debug)]
pub struct TerminalDisplay<W: Write> {
    out: W,
    fixed_width: Option<usize>,
}

impl TerminalDisplay<Stdout> {
    /// Draw into the process's stdout, querying the real terminal width
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fixed_width: None,
        }
    }

    /// Use a fixed width instead of asking the terminal
    pub fn with_width(out: W, width: usize) -> Self {
        Self {
            out,
            fixed_width: Some(width),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))
    }

    fn move_cursor(&mut self, column: u16, row: u16) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(column.saturating_sub(1), row.saturating_sub(1))
        )
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn width(&self) -> usize {
        if let Some(width) = self.fixed_width {
            return width;
        }
        match terminal::size() {
            Ok((columns, _)) => columns as usize,
            Err(e) => {
                debug!(error = %e, "Terminal size unavailable, using fallback width");
                FALLBACK_TERMINAL_WIDTH
            }
        }
    }
}

/// Hides the terminal cursor and shows it again when dropped
#[derive(Debug)]
pub struct CursorGuard {
    _private: (),
}

impl CursorGuard {
    pub fn hide() -> io::Result<Self> {
        execute!(io::stdout(), Hide)?;
        Ok(Self { _private: () })
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), Show) {
            warn!(error = %e, "Failed to restore cursor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub DisplaySink {}

        impl DisplaySink for DisplaySink {
            fn clear(&mut self) -> io::Result<()>;
            fn move_cursor(&mut self, column: u16, row: u16) -> io::Result<()>;
            fn write(&mut self, text: &str) -> io::Result<()>;
            fn flush(&mut self) -> io::Result<()>;
            fn width(&self) -> usize;
        }
    }

    #[test]
    fn test_move_cursor_is_one_based() -> io::Result<()> {
        let mut display = TerminalDisplay::with_width(Vec::new(), 80);
        display.move_cursor(1, 1)?;
        display.flush()?;
        assert_eq!(display.into_inner(), b"\x1b[1;1H");
        Ok(())
    }

    #[test]
    fn test_clear_and_write() -> io::Result<()> {
        let mut display = TerminalDisplay::with_width(Vec::new(), 80);
        display.clear()?;
        display.write("frame")?;
        display.flush()?;
        let out = String::from_utf8_lossy(&display.into_inner()).into_owned();
        assert!(out.starts_with("\x1b[2J"));
        assert!(out.ends_with("frame"));
        Ok(())
    }

    #[test]
    fn test_fixed_width() {
        let display = TerminalDisplay::with_width(Vec::new(), 120);
        assert_eq!(display.width(), 120);
    }
}

#[cfg(test)]
pub use tests::MockDisplaySink;
