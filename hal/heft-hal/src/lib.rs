//! Heft Hardware Abstraction Layer
//!
//! This crate defines the capabilities the converter driver needs from its
//! environment. Chip-specific HALs (RP2040, host simulations, etc.) implement
//! them so the same driver runs everywhere.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  heft-drivers (Hx711 converter driver)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  heft-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ heft-hal-     │       │ simulated     │
//! │    rp2040     │       │ chip (tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O with one-time role setup
//! - [`DelayNs`] - Short and long blocking delays (re-exported from `embedded-hal`)
//! - [`clock::Monotonic`] - Microsecond time source for deadlines
//! - [`critical::CriticalSection`] - Scoped uninterruptible execution

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod critical;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use clock::Monotonic;
pub use critical::{CriticalSection, InterruptFree};
pub use embedded_hal::delay::DelayNs;
pub use gpio::{InputPin, OutputPin, Pull};
