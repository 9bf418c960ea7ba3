//! Board-agnostic core logic for the load cell firmware
//!
//! This crate contains everything that does not depend on specific
//! hardware implementations:
//!
//! - Gain/channel selection and its trailing clock pulse encoding
//! - 24-bit two's-complement sample decoding
//! - Calibration math (tare offset, unit scale)
//! - Fixed-capacity sample window and probe deviation monitor
//! - Configuration types and the embedded config parser
//! - The `LoadCell` trait implemented by converter drivers

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod gain;
pub mod sample;
pub mod traits;
pub mod window;

pub use config::Calibration;
pub use gain::{Channel, Gain};
pub use traits::LoadCell;
pub use window::{DeviationMonitor, SampleWindow, WindowSummary};
