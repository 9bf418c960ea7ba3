//! RP2040-specific HAL for the load cell firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `heft-hal` traits:
//!
//! - Bidirectional GPIO lines configured by the driver that owns them
//! - Monotonic microsecond clock from the embassy time driver
//!
//! Delays use `embassy_time::Delay` directly (it implements `DelayNs`), and
//! the critical section comes from `embassy-rp`'s `critical-section-impl`
//! through `heft_hal::InterruptFree`.

#![no_std]

pub mod gpio;
pub mod time;

pub use gpio::FlexPin;
pub use time::EmbassyClock;

// Critical section backed by embassy-rp's critical-section implementation
pub use heft_hal::InterruptFree;
