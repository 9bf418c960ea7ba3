//! Scale and display configuration

use core::num::NonZeroU8;

use heapless::{String, Vec};

use super::Calibration;
use crate::gain::Gain;

/// Maximum number of converters the firmware polls
pub const MAX_SCALES: usize = 2;

/// Maximum length of a scale name or label
pub const MAX_LABEL_LEN: usize = 8;

/// Default number of raw reads averaged per displayed value
pub const DEFAULT_SAMPLES: u8 = 1;

/// Default poll interval in milliseconds
pub const DEFAULT_REFRESH_MS: u32 = 10;

/// Default deviation threshold, as a percentage of the window average
pub const DEFAULT_DEVIATION_PERCENT: u8 = 20;

/// Configuration for one converter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleConfig {
    /// Section name (`[scale.<name>]`)
    pub name: String<MAX_LABEL_LEN>,
    /// Text shown on the display
    pub label: String<MAX_LABEL_LEN>,
    /// Gain/channel used from the second conversion onwards
    pub gain: Gain,
    /// Raw reads averaged per value (never zero)
    pub samples: u8,
    /// Initial tare offset and unit scale
    pub calibration: Calibration,
    /// Record the current load as zero at boot
    pub tare_on_boot: bool,
}

impl ScaleConfig {
    /// Default configuration for a named scale
    ///
    /// Names longer than [`MAX_LABEL_LEN`] are truncated.
    pub fn named(name: &str) -> Self {
        let name = truncate(name);
        Self {
            name: name.clone(),
            label: name,
            gain: Gain::A128,
            samples: DEFAULT_SAMPLES,
            calibration: Calibration::new(),
            tare_on_boot: false,
        }
    }

    /// Averaging count as a non-zero value
    pub fn samples(&self) -> NonZeroU8 {
        NonZeroU8::new(self.samples).unwrap_or(NonZeroU8::MIN)
    }
}

/// Display refresh and highlighting settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Poll/redraw interval in milliseconds
    pub refresh_ms: u32,
    /// Probe deviation (percent of window average) that triggers highlighting
    pub deviation_percent: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ms: DEFAULT_REFRESH_MS,
            deviation_percent: DEFAULT_DEVIATION_PERCENT,
        }
    }
}

/// Complete firmware configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeftConfig {
    /// Configured scales, in file order
    pub scales: Vec<ScaleConfig, MAX_SCALES>,
    /// Display settings
    pub display: DisplayConfig,
}

impl Default for HeftConfig {
    fn default() -> Self {
        let mut scales = Vec::new();
        let _ = scales.push(ScaleConfig::named("scale1"));
        let _ = scales.push(ScaleConfig::named("scale2"));
        Self {
            scales,
            display: DisplayConfig::default(),
        }
    }
}

impl HeftConfig {
    /// Configuration with no scales and default display settings
    pub fn empty() -> Self {
        Self {
            scales: Vec::new(),
            display: DisplayConfig::default(),
        }
    }

    /// Configuration for the scale at `index`
    ///
    /// Falls back to a default `scale<N>` entry when the file configured
    /// fewer scales than the board has.
    pub fn scale(&self, index: usize) -> ScaleConfig {
        match self.scales.get(index) {
            Some(scale) => scale.clone(),
            None => {
                let mut name: String<MAX_LABEL_LEN> = String::new();
                let _ = name.push_str("scale");
                let digit = b'1' + (index % 9) as u8;
                let _ = name.push(digit as char);
                ScaleConfig::named(&name)
            }
        }
    }

    /// Find a scale by section name
    pub fn find_scale(&self, name: &str) -> Option<&ScaleConfig> {
        self.scales.iter().find(|s| s.name.as_str() == name)
    }
}

fn truncate(text: &str) -> String<MAX_LABEL_LEN> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
