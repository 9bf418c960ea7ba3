//! Conversion result decoding
//!
//! The converter shifts out a 24-bit two's-complement value, most
//! significant byte first.

/// Number of data bits per conversion
pub const DATA_BITS: u8 = 24;

/// Largest positive conversion result
pub const MAX_VALUE: i32 = 0x7F_FFFF;

/// Most negative conversion result
pub const MIN_VALUE: i32 = -0x80_0000;

/// Compose three sampled bytes into a sign-extended 32-bit value
///
/// `bytes` is in wire order: `[msb, mid, lsb]`. If bit 7 of the most
/// significant byte is set the top byte of the result is filled with ones.
pub const fn decode(bytes: [u8; 3]) -> i32 {
    let filler = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    i32::from_be_bytes([filler, bytes[0], bytes[1], bytes[2]])
}

/// Split a 24-bit value back into wire-order bytes
///
/// Bits above bit 23 are discarded.
pub const fn encode(value: i32) -> [u8; 3] {
    let [_, msb, mid, lsb] = value.to_be_bytes();
    [msb, mid, lsb]
}

/// Check for the all-ones pattern
///
/// A clock pulse stretched past ~60 µs resets the chip mid-transfer, after
/// which every remaining bit reads as 1. A full-ones word decodes to -1.
/// This is a plausibility hint only: -1 is also a legitimate reading.
pub const fn is_saturated(value: i32) -> bool {
    value == -1
}
