//! Backend that records draw calls

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};
use crate::screen::{LINE_LEN, SCREEN_COLS, SCREEN_ROWS};

pub struct RecordingBackend {
    pub clears: u32,
    pub flushes: u32,
    pub text: Vec<(u8, u8, String<LINE_LEN>)>,
    pub inverted: Vec<(u8, u8, u8)>,
    pub fail: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            clears: 0,
            flushes: 0,
            text: Vec::new(),
            inverted: Vec::new(),
            fail: false,
        }
    }
}

impl DisplayBackend for RecordingBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Communication);
        }
        self.clears += 1;
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let mut line = String::new();
        line.push_str(text)
            .map_err(|_| DisplayError::InvalidCoordinates)?;
        self.text.push((row, col, line));
        Ok(())
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        self.inverted.push((row, start_col, end_col));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.flushes += 1;
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}
