//! SH1106 128x64 OLED backend
//!
//! Text is drawn with a 5x8 font on a 6x8 cell grid (21 columns, 8 rows)
//! into the driver's frame buffer, then sent over I2C on flush.

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use sh1106::interface::DisplayInterface;
use sh1106::mode::GraphicsMode;

use heft_display::screen::{LINE_LEN, SCREEN_COLS, SCREEN_ROWS};
use heft_display::{DisplayBackend, DisplayError};

/// 5x8 glyphs with one column of spacing
const FONT: MonoFont<'static> = MonoFont {
    character_spacing: 1,
    ..FONT_5X8
};

const CELL_WIDTH: i32 = 6;
const CELL_HEIGHT: i32 = 8;

/// Character-cell backend over an SH1106 in graphics mode
pub struct Oled<DI>
where
    DI: DisplayInterface,
{
    display: GraphicsMode<DI>,
    /// Text drawn since the last clear, needed to redraw inverted cells
    rows: [String<LINE_LEN>; SCREEN_ROWS],
}

impl<DI> Oled<DI>
where
    DI: DisplayInterface,
{
    /// Initialise the panel and blank it
    pub fn new(mut display: GraphicsMode<DI>) -> Result<Self, DisplayError> {
        display.init().map_err(|_| DisplayError::Communication)?;
        display.clear();
        display.flush().map_err(|_| DisplayError::Communication)?;

        Ok(Self {
            display,
            rows: core::array::from_fn(|_| String::new()),
        })
    }

    fn draw_cells(
        &mut self,
        row: u8,
        col: u8,
        text: &str,
        color: BinaryColor,
    ) -> Result<(), DisplayError> {
        let origin = Point::new(i32::from(col) * CELL_WIDTH, i32::from(row) * CELL_HEIGHT);
        let style = MonoTextStyle::new(&FONT, color);
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(&mut self.display)
            .map_err(|_| DisplayError::Communication)?;
        Ok(())
    }
}

impl<DI> DisplayBackend for Oled<DI>
where
    DI: DisplayInterface,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.display.clear();
        for row in &mut self.rows {
            row.clear();
        }
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let line = self
            .rows
            .get_mut(usize::from(row))
            .ok_or(DisplayError::InvalidCoordinates)?;
        if usize::from(col) >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        // Keep a copy of the row, padded so column positions line up
        while line.len() < usize::from(col) {
            let _ = line.push(' ');
        }
        line.truncate(usize::from(col));
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }

        self.draw_cells(row, col, text, BinaryColor::On)
    }

    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS || start_col >= end_col {
            return Err(DisplayError::InvalidCoordinates);
        }
        let end_col = end_col.min(SCREEN_COLS as u8);

        let top_left = Point::new(
            i32::from(start_col) * CELL_WIDTH,
            i32::from(row) * CELL_HEIGHT,
        );
        let size = Size::new(
            u32::from(end_col - start_col) * CELL_WIDTH as u32,
            CELL_HEIGHT as u32,
        );
        Rectangle::new(top_left, size)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.display)
            .map_err(|_| DisplayError::Communication)?;

        // Redraw the covered characters dark on light
        let mut covered: String<LINE_LEN> = String::new();
        for ch in self.rows[usize::from(row)]
            .chars()
            .skip(usize::from(start_col))
            .take(usize::from(end_col - start_col))
        {
            let _ = covered.push(ch);
        }
        if !covered.is_empty() {
            self.draw_cells(row, start_col, &covered, BinaryColor::Off)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.display
            .flush()
            .map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}
