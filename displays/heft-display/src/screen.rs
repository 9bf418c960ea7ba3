//! Screen buffer types
//!
//! Provides a character-based screen buffer for text-mode displays.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows (128x64 panel, 8 px font height)
pub const SCREEN_ROWS: usize = 8;

/// Number of character columns (128x64 panel, 6 px glyph advance)
pub const SCREEN_COLS: usize = 21;

/// Maximum characters per line
pub const LINE_LEN: usize = SCREEN_COLS;

/// Screen buffer for text-mode displays
///
/// Content is composed here and pushed to any `DisplayBackend` with
/// [`Screen::render`], only when something changed.
#[derive(Clone)]
pub struct Screen {
    /// Current display content
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    /// Highlight state per row (start_col, end_col)
    highlights: [Option<(u8, u8)>; SCREEN_ROWS],
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            highlights: [None; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Clear the entire screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.highlights = [None; SCREEN_ROWS];
        self.dirty = true;
    }

    /// Set the content of a specific row
    ///
    /// Text beyond [`LINE_LEN`] characters is cut off. Rows outside the
    /// screen are ignored.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        if line.as_str() == text {
            return;
        }

        line.clear();
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Set highlight (invert) region for a row
    pub fn set_highlight(&mut self, row: usize, start_col: u8, end_col: u8) {
        if let Some(highlight) = self.highlights.get_mut(row) {
            *highlight = Some((start_col, end_col));
            self.dirty = true;
        }
    }

    /// Clear highlight for a row
    pub fn clear_highlight(&mut self, row: usize) {
        if let Some(highlight) = self.highlights.get_mut(row) {
            if highlight.take().is_some() {
                self.dirty = true;
            }
        }
    }

    /// Get highlight region for a row
    pub fn get_highlight(&self, row: usize) -> Option<(u8, u8)> {
        self.highlights.get(row).copied().flatten()
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Draw the buffer onto `backend` and flush it
    ///
    /// Does nothing while the screen is clean. Rows and columns the backend
    /// cannot show are skipped. The screen stays dirty if the backend fails.
    pub fn render<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        if !self.dirty {
            return Ok(());
        }

        let (cols, rows) = backend.dimensions();
        backend.clear()?;

        for (row, line) in self.lines.iter().enumerate().take(usize::from(rows)) {
            if !line.is_empty() {
                backend.draw_text(row as u8, 0, line.as_str())?;
            }
            if let Some((start, end)) = self.highlights[row] {
                let end = end.min(cols);
                if start < end {
                    backend.invert_region(row as u8, start, end)?;
                }
            }
        }

        backend.flush()?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
