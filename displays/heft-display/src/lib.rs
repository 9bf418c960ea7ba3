//! Display abstraction and dashboard for Heft
//!
//! This crate provides:
//! - `DisplayBackend` trait for character-cell displays (OLED, LCD, etc.)
//! - `Screen`, a dirty-tracked 8x21 character buffer
//! - `Dashboard`, the load cell readout laid out on a `Screen`
//!
//! # Architecture
//!
//! The acquisition side fills a `Dashboard` and hands it over. The display
//! side draws it onto a `Screen` and renders that through whatever
//! `DisplayBackend` the board provides, so layout is testable on the host.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod dashboard;
pub mod screen;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use dashboard::{Dashboard, ScaleLine};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
