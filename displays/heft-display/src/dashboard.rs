//! Load cell dashboard
//!
//! Lays out live readings, the window summary and the last deviating window
//! on a [`Screen`]:
//!
//! ```text
//! row 0..S   one line per scale       "LEFT           1234.5"
//! row S      window summary           "21890 1990 (1989)"
//! row S+1..  history around the probe "0007C5      1989"
//! ```

use core::fmt::Write;

use heapless::{String, Vec};

use heft_core::config::{MAX_LABEL_LEN, MAX_SCALES};
use heft_core::window::{SampleWindow, WindowSummary, PROBE_FROM_OLDEST};

use crate::screen::{Screen, LINE_LEN, SCREEN_ROWS};

/// Formatting buffer, wider than a line so long numbers truncate cleanly
type Line = String<32>;

/// Latest reading of one scale
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleLine {
    pub label: String<MAX_LABEL_LEN>,
    /// Raw converter output
    pub raw: Option<i32>,
    /// Calibrated value
    pub units: Option<f32>,
}

/// Everything the dashboard shows, built by the acquisition side
#[derive(Clone)]
pub struct Dashboard<const N: usize> {
    scales: Vec<ScaleLine, MAX_SCALES>,
    summary: Option<WindowSummary>,
    history: Option<SampleWindow<N>>,
}

impl<const N: usize> Default for Dashboard<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Dashboard<N> {
    pub const fn new() -> Self {
        Self {
            scales: Vec::new(),
            summary: None,
            history: None,
        }
    }

    /// Add a scale line; returns its index, or `None` when all slots are taken
    pub fn add_scale(&mut self, label: &str) -> Option<usize> {
        let mut text = String::new();
        for ch in label.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        self.scales
            .push(ScaleLine {
                label: text,
                raw: None,
                units: None,
            })
            .ok()?;
        Some(self.scales.len() - 1)
    }

    /// Record a new reading for the scale at `index`
    pub fn set_reading(&mut self, index: usize, raw: i32, units: f32) {
        if let Some(line) = self.scales.get_mut(index) {
            line.raw = Some(raw);
            line.units = Some(units);
        }
    }

    pub fn scale(&self, index: usize) -> Option<&ScaleLine> {
        self.scales.get(index)
    }

    pub fn set_summary(&mut self, summary: WindowSummary) {
        self.summary = Some(summary);
    }

    /// Replace the history with a copy of `window`
    pub fn set_history(&mut self, window: &SampleWindow<N>) {
        self.history = Some(window.clone());
    }

    /// Write the dashboard onto `screen`
    pub fn draw(&self, screen: &mut Screen) {
        let mut row = 0;

        for scale in &self.scales {
            screen.set_line(row, &scale_text(scale));
            screen.clear_highlight(row);
            row += 1;
        }

        match &self.summary {
            Some(summary) => screen.set_line(row, &summary_text(summary)),
            None => screen.set_line(row, "waiting"),
        }
        screen.clear_highlight(row);
        row += 1;

        let rows_left = SCREEN_ROWS.saturating_sub(row);
        let mut drawn = 0;

        if let Some(history) = &self.history {
            let len = history.len();
            let shown = rows_left.min(len);
            let start = PROBE_FROM_OLDEST
                .saturating_sub(shown / 2)
                .min(len - shown);

            for (offset, value) in history.iter_oldest_first().skip(start).take(shown).enumerate() {
                let target = row + offset;
                screen.set_line(target, &history_text(value));
                if start + offset == PROBE_FROM_OLDEST {
                    screen.set_highlight(target, 0, LINE_LEN as u8);
                } else {
                    screen.clear_highlight(target);
                }
            }
            drawn = shown;
        }

        for target in row + drawn..SCREEN_ROWS {
            screen.set_line(target, "");
            screen.clear_highlight(target);
        }
    }
}

/// `LABEL        units`, units right-aligned
fn scale_text(scale: &ScaleLine) -> Line {
    let mut text = Line::new();
    let width = LINE_LEN - MAX_LABEL_LEN - 1;
    let _ = match scale.units {
        Some(units) => write!(text, "{:<8} {:>w$.1}", scale.label.as_str(), units, w = width),
        None => write!(text, "{:<8} {:>w$}", scale.label.as_str(), "---", w = width),
    };
    text
}

/// `sum average (probe)`
fn summary_text(summary: &WindowSummary) -> Line {
    let mut text = Line::new();
    let _ = match summary.probe {
        Some(probe) => write!(text, "{} {} ({})", summary.sum, summary.average, probe),
        None => write!(text, "{} {}", summary.sum, summary.average),
    };
    text
}

/// 24-bit two's complement as hex, then decimal
fn history_text(value: i32) -> Line {
    let mut text = Line::new();
    let _ = write!(text, "{:06X} {:>9}", value as u32 & 0x00FF_FFFF, value);
    text
}
