//! Load cell converter trait

use core::num::NonZeroU8;

use crate::config::Calibration;
use crate::gain::Gain;

/// Trait for load cell converters
///
/// Implementations own one physical chip. Acquisition is polled: callers
/// check [`LoadCell::is_ready`] (or a bounded wait) before calling
/// [`LoadCell::read`], which blocks until a conversion is available.
pub trait LoadCell {
    /// True iff a new conversion result is latched and can be read
    fn is_ready(&self) -> bool;

    /// Read one conversion as a sign-extended 24-bit value
    fn read(&mut self) -> i32;

    /// Select gain/channel; takes effect on the conversion after the next read
    fn set_gain(&mut self, gain: Gain);

    /// Current gain/channel selection
    fn gain(&self) -> Gain;

    /// Current tare offset and unit scale
    fn calibration(&self) -> Calibration;

    /// Replace the tare offset and unit scale
    fn set_calibration(&mut self, calibration: Calibration);

    /// Put the chip into low-power sleep
    fn power_down(&mut self);

    /// Wake the chip from sleep
    fn power_up(&mut self);

    /// Average of `times` consecutive reads, truncated toward zero
    fn read_average(&mut self, times: NonZeroU8) -> i32;

    /// Offset-adjusted average
    fn get_value(&mut self, times: NonZeroU8) -> f64;

    /// Offset-adjusted average divided by the scale
    fn get_units(&mut self, times: NonZeroU8) -> f32;

    /// Record the current average reading as the zero point
    fn tare(&mut self, times: NonZeroU8);
}
