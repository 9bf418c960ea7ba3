//! Display hardware
//!
//! `DisplayBackend` implementations for the panels this firmware drives.

pub mod oled;

pub use oled::Oled;
