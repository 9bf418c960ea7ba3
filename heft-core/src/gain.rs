//! Gain and input channel selection
//!
//! The converter has no configuration register. Channel and amplification
//! for the *next* conversion are selected by the number of extra clock
//! pulses issued after the 24 data bits of the current one.

/// Differential input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel A (gain 128 or 64)
    A,
    /// Channel B (fixed gain 32)
    B,
}

/// Gain mode, selecting both channel and amplification factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// Channel A, gain 128 (power-on default)
    #[default]
    A128,
    /// Channel A, gain 64
    A64,
    /// Channel B, gain 32
    B32,
}

impl Gain {
    /// Number of clock pulses issued after the 24 data bits
    pub const fn pulses(self) -> u8 {
        match self {
            Gain::A128 => 1,
            Gain::B32 => 2,
            Gain::A64 => 3,
        }
    }

    /// Input channel sampled in this mode
    pub const fn channel(self) -> Channel {
        match self {
            Gain::A128 | Gain::A64 => Channel::A,
            Gain::B32 => Channel::B,
        }
    }

    /// Amplification factor
    pub const fn factor(self) -> u8 {
        match self {
            Gain::A128 => 128,
            Gain::A64 => 64,
            Gain::B32 => 32,
        }
    }

    /// Look up a mode by its amplification factor (128, 64 or 32)
    pub const fn from_factor(factor: u8) -> Option<Self> {
        match factor {
            128 => Some(Gain::A128),
            64 => Some(Gain::A64),
            32 => Some(Gain::B32),
            _ => None,
        }
    }

    /// Look up a mode by its trailing pulse count (1, 2 or 3)
    pub const fn from_pulses(pulses: u8) -> Option<Self> {
        match pulses {
            1 => Some(Gain::A128),
            2 => Some(Gain::B32),
            3 => Some(Gain::A64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_counts() {
        assert_eq!(Gain::A128.pulses(), 1);
        assert_eq!(Gain::A64.pulses(), 3);
        assert_eq!(Gain::B32.pulses(), 2);
    }

    #[test]
    fn test_channels() {
        assert_eq!(Gain::A128.channel(), Channel::A);
        assert_eq!(Gain::A64.channel(), Channel::A);
        assert_eq!(Gain::B32.channel(), Channel::B);
    }

    #[test]
    fn test_default_is_channel_a_128() {
        assert_eq!(Gain::default(), Gain::A128);
    }

    #[test]
    fn test_factor_lookup() {
        for gain in [Gain::A128, Gain::A64, Gain::B32] {
            assert_eq!(Gain::from_factor(gain.factor()), Some(gain));
            assert_eq!(Gain::from_pulses(gain.pulses()), Some(gain));
        }
        assert_eq!(Gain::from_factor(16), None);
        assert_eq!(Gain::from_pulses(0), None);
        assert_eq!(Gain::from_pulses(4), None);
    }
}
