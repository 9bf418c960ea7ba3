//! Calibration state
//!
//! Offset and scale only affect values derived after acquisition; they
//! never change how the converter is read.

/// Tare offset and unit scale for one converter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Raw reading that represents zero load
    pub offset: i32,
    /// Raw units per physical unit (e.g. counts per gram)
    pub scale: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibration {
    /// No offset, no unit conversion
    pub const fn new() -> Self {
        Self {
            offset: 0,
            scale: 1.0,
        }
    }

    /// Create from known offset and scale
    pub const fn with(offset: i32, scale: f32) -> Self {
        Self { offset, scale }
    }

    /// Offset-adjusted value for an averaged raw reading
    ///
    /// Computed in `f64` so large offsets cannot overflow.
    pub fn value(&self, average: i32) -> f64 {
        f64::from(average) - f64::from(self.offset)
    }

    /// Value in physical units for an averaged raw reading
    pub fn units(&self, average: i32) -> f32 {
        (self.value(average) / f64::from(self.scale)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let cal = Calibration::default();
        assert_eq!(cal.offset, 0);
        assert_eq!(cal.scale, 1.0);
        assert_eq!(cal.value(1234), 1234.0);
        assert_eq!(cal.units(-50), -50.0);
    }

    #[test]
    fn test_value_and_units() {
        let cal = Calibration::with(100, 2.0);
        assert_eq!(cal.value(300), 200.0);
        assert_eq!(cal.units(300), 100.0);
    }

    #[test]
    fn test_value_does_not_overflow() {
        let cal = Calibration::with(i32::MIN, 1.0);
        assert_eq!(cal.value(i32::MAX), f64::from(i32::MAX) - f64::from(i32::MIN));
    }
}
