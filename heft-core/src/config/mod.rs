//! Configuration types
//!
//! Board-agnostic configuration structures, parsed from the `scales.toml`
//! compiled into the firmware.

pub mod calibration;
pub mod parse;
pub mod scale;

pub use calibration::Calibration;
pub use parse::{parse_config, ConfigError};
pub use scale::*;
