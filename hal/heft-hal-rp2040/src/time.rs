//! Monotonic clock backed by the embassy time driver

use embassy_time::Instant;
use heft_hal::Monotonic;

/// Microsecond clock reading `embassy_time::Instant`
///
/// The RP2040 timer is a 64-bit microsecond counter, so it does not wrap
/// within the lifetime of the device.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}
