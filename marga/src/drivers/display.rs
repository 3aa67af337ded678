//! Character display trait and in-memory panels

use crate::error::Result;

/// Rows of the character panel
pub const DISPLAY_ROWS: usize = 2;

/// Columns of the character panel
pub const DISPLAY_COLS: usize = 16;

/// Character display driver trait (1-based cursor)
pub trait Display: Send {
    /// Write `text` starting at (`row`, `col`). Text past the last column is dropped.
    fn print_at(&mut self, row: u8, col: u8, text: &str) -> Result<()>;
}

/// 2x16 frame buffer with the same cursor semantics as the panel
#[derive(Debug, Clone)]
pub struct TextPanel {
    cells: [[char; DISPLAY_COLS]; DISPLAY_ROWS],
}

impl TextPanel {
    pub fn new() -> Self {
        Self {
            cells: [[' '; DISPLAY_COLS]; DISPLAY_ROWS],
        }
    }

    /// Write into the buffer; out-of-range positions are ignored
    pub fn write(&mut self, row: u8, col: u8, text: &str) {
        let Some(cells) = (row as usize)
            .checked_sub(1)
            .and_then(|r| self.cells.get_mut(r))
        else {
            return;
        };
        let start = (col as usize).saturating_sub(1);
        for (cell, ch) in cells.iter_mut().skip(start).zip(text.chars()) {
            *cell = ch;
        }
    }

    /// Contents of a 1-based row
    pub fn row(&self, row: u8) -> String {
        (row as usize)
            .checked_sub(1)
            .and_then(|r| self.cells.get(r))
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }
}

impl Default for TextPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Display that mirrors the panel into the log at trace level
#[derive(Default)]
pub struct LogDisplay {
    panel: TextPanel,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> &TextPanel {
        &self.panel
    }
}

impl Display for LogDisplay {
    fn print_at(&mut self, row: u8, col: u8, text: &str) -> Result<()> {
        self.panel.write(row, col, text);
        log::trace!("Display: [{}]", self.panel.row(row));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_write_and_truncate() {
        let mut panel = TextPanel::new();
        panel.write(1, 1, "+0045");
        panel.write(1, 14, "+12345");
        assert_eq!(panel.row(1), "+0045        +12");
        assert_eq!(panel.row(2), " ".repeat(16));
    }

    #[test]
    fn test_panel_ignores_invalid_rows() {
        let mut panel = TextPanel::new();
        panel.write(0, 1, "x");
        panel.write(3, 1, "x");
        assert_eq!(panel.row(1).trim(), "");
        assert_eq!(panel.row(3), "");
    }

    #[test]
    fn test_log_display_keeps_panel() {
        let mut display = LogDisplay::new();
        display.print_at(2, 3, "ab").unwrap();
        assert_eq!(&display.panel().row(2)[..4], "  ab");
    }
}
