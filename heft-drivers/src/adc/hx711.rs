//! HX711 24-bit load cell converter
//!
//! Bit-banged two-wire interface: the driver owns the serial clock line
//! (PD_SCK, output) and the data line (DOUT, input with pull-up).
//!
//! Protocol:
//! - DOUT low means a conversion is latched and ready.
//! - 24 clock pulses shift the result out MSB first; DOUT is sampled while
//!   the clock is high.
//! - 1 to 3 further pulses select gain/channel for the *next* conversion.
//! - Holding the clock high for more than ~60 µs powers the chip down, so
//!   the whole transfer runs inside a critical section.

use core::num::NonZeroU8;

use heft_core::config::Calibration;
use heft_core::gain::Gain;
use heft_core::sample;
use heft_core::traits::LoadCell;
use heft_hal::{CriticalSection, DelayNs, InputPin, InterruptFree, Monotonic, OutputPin, Pull};

/// Clock high/low hold time per edge, in nanoseconds
///
/// Datasheet allows 0.2 µs to 50 µs; 1 µs is the typical value.
pub const CLOCK_HALF_PERIOD_NS: u32 = 1_000;

/// Clock-high hold after a power-down request, in microseconds
///
/// The chip enters sleep once the clock has been high for 60 µs.
pub const POWER_DOWN_HOLD_US: u32 = 64;

/// Default poll attempts for [`Hx711::wait_ready_retry`]
pub const DEFAULT_RETRIES: u32 = 3;

/// Default deadline for [`Hx711::wait_ready_timeout`], in milliseconds
pub const DEFAULT_TIMEOUT_MS: u32 = 1_000;

/// Default inter-poll delay, in milliseconds
///
/// Every wait still yields for at least 1 µs between polls.
pub const DEFAULT_POLL_DELAY_MS: u32 = 0;

/// Default sample count for [`Hx711::read_average`] and [`Hx711::tare`]
pub const DEFAULT_AVERAGE: NonZeroU8 = match NonZeroU8::new(10) {
    Some(n) => n,
    None => panic!(),
};

/// Single sample, the default for [`Hx711::get_value`] and [`Hx711::get_units`]
pub const SINGLE_READ: NonZeroU8 = NonZeroU8::MIN;

/// HX711 converter driver
///
/// # Type parameters
/// - `CLK`: PD_SCK output line
/// - `DATA`: DOUT input line
/// - `D`: blocking delay (sub-microsecond resolution for bit timing)
/// - `T`: monotonic clock for [`Hx711::wait_ready_timeout`]
/// - `CS`: critical section guarding the bit transfer
pub struct Hx711<CLK, DATA, D, T, CS = InterruptFree> {
    clock: CLK,
    data: DATA,
    delay: D,
    time: T,
    critical: CS,
    /// Gain applied by the trailing pulses of the next read
    gain: Gain,
    calibration: Calibration,
}

impl<CLK, DATA, D, T, CS> Hx711<CLK, DATA, D, T, CS>
where
    CLK: OutputPin,
    DATA: InputPin,
    D: DelayNs,
    T: Monotonic,
    CS: CriticalSection,
{
    /// Create a new driver and configure its lines
    ///
    /// The clock line becomes an output driven low (chip awake), the data
    /// line an input with pull-up. This is the only place pin roles are set.
    ///
    /// Channel selection follows the gain: 128 and 64 select channel A,
    /// 32 selects channel B. The chip itself starts on channel A ×128; the
    /// requested gain is programmed by the first read.
    pub fn new(mut clock: CLK, mut data: DATA, delay: D, time: T, critical: CS, gain: Gain) -> Self {
        clock.configure_output();
        clock.set_low();
        data.configure_input(Pull::Up);

        Self {
            clock,
            data,
            delay,
            time,
            critical,
            gain,
            calibration: Calibration::new(),
        }
    }

    /// Check if a conversion result is ready
    ///
    /// From the datasheet: DOUT stays high while no data is available and
    /// goes low once a conversion is latched.
    pub fn is_ready(&self) -> bool {
        self.data.is_low()
    }

    /// Block until the chip is ready
    ///
    /// Never returns if no chip is attached. Sleeps `delay_ms` plus 1 µs
    /// between polls.
    pub fn wait_ready(&mut self, delay_ms: u32) {
        while !self.is_ready() {
            self.pause(delay_ms);
        }
    }

    /// Poll up to `retries` times, sleeping `delay_ms` plus 1 µs after each
    /// failed poll
    ///
    /// Returns `false` once the attempts are exhausted.
    pub fn wait_ready_retry(&mut self, retries: u32, delay_ms: u32) -> bool {
        for _ in 0..retries {
            if self.is_ready() {
                return true;
            }
            self.pause(delay_ms);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("hx711 not ready after {} polls", retries);
        false
    }

    /// Poll until ready or until `timeout_ms` has elapsed
    ///
    /// Elapsed time is measured on the monotonic clock with wrapping
    /// arithmetic. A chip that becomes ready exactly at the deadline may be
    /// reported either way.
    ///
    /// DOUT stays low until the result is read, so a conversion latched
    /// during the last sleep is still seen by the final poll even when
    /// `delay_ms` overshoots the deadline.
    pub fn wait_ready_timeout(&mut self, timeout_ms: u32, delay_ms: u32) -> bool {
        let timeout_us = u64::from(timeout_ms) * 1_000;
        let start = self.time.now_micros();

        while self.time.elapsed_since(start) < timeout_us {
            if self.is_ready() {
                return true;
            }
            self.pause(delay_ms);
        }

        if self.is_ready() {
            return true;
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("hx711 not ready after {} ms", timeout_ms);
        false
    }

    /// Wait for the chip and read one conversion
    ///
    /// Blocks forever if the chip never becomes ready; use one of the
    /// bounded waits first if that matters.
    ///
    /// The 24 data bits and the gain pulses are clocked inside the critical
    /// section. An interrupt that stretched a clock-high phase past 60 µs
    /// would reset the chip and every remaining bit would read as 1.
    pub fn read(&mut self) -> i32 {
        self.wait_ready(DEFAULT_POLL_DELAY_MS);

        let pulses = self.gain.pulses();
        let clock = &mut self.clock;
        let data = &self.data;
        let delay = &mut self.delay;

        let bytes = self.critical.with(|| {
            let msb = shift_in(clock, data, delay);
            let mid = shift_in(clock, data, delay);
            let lsb = shift_in(clock, data, delay);

            // Program channel and gain for the next conversion
            for _ in 0..pulses {
                pulse(clock, delay);
            }

            [msb, mid, lsb]
        });

        sample::decode(bytes)
    }

    /// Average of `times` reads, truncated toward zero
    ///
    /// The sum is kept in 64 bits, so 255 full-scale reads cannot overflow.
    pub fn read_average(&mut self, times: NonZeroU8) -> i32 {
        let mut sum: i64 = 0;
        for _ in 0..times.get() {
            sum += i64::from(self.read());
            self.delay.delay_us(1);
        }
        (sum / i64::from(times.get())) as i32
    }

    /// Average reading minus the tare offset
    pub fn get_value(&mut self, times: NonZeroU8) -> f64 {
        let average = self.read_average(times);
        self.calibration.value(average)
    }

    /// Average reading minus the tare offset, divided by the scale
    pub fn get_units(&mut self, times: NonZeroU8) -> f32 {
        let average = self.read_average(times);
        self.calibration.units(average)
    }

    /// Record the current average raw reading as the zero point
    pub fn tare(&mut self, times: NonZeroU8) {
        self.calibration.offset = self.read_average(times);
    }

    /// Put the chip into power-down mode
    ///
    /// Leaves the clock high; the chip sleeps once it has been high for
    /// 60 µs, which has passed when this returns.
    pub fn power_down(&mut self) {
        self.clock.set_low();
        self.clock.set_high();
        self.delay.delay_us(POWER_DOWN_HOLD_US);
    }

    /// Wake the chip from power-down mode
    ///
    /// The chip restarts on channel A ×128 and the first conversion after
    /// waking should be discarded.
    pub fn power_up(&mut self) {
        self.clock.set_low();
    }

    fn pause(&mut self, delay_ms: u32) {
        if delay_ms > 0 {
            self.delay.delay_ms(delay_ms);
        }
        self.delay.delay_us(1);
    }
}

impl<CLK, DATA, D, T, CS> Hx711<CLK, DATA, D, T, CS> {
    /// Set the gain factor
    ///
    /// Takes effect only after the next [`Hx711::read`]: the gain pulses
    /// trail the data bits of the read that precedes the new conversion.
    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    /// Gain programmed by the next read
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Set the value used to convert raw readings into units
    pub fn set_scale(&mut self, scale: f32) {
        self.calibration.scale = scale;
    }

    /// Current unit scale
    pub fn scale(&self) -> f32 {
        self.calibration.scale
    }

    /// Set the raw reading subtracted as tare weight
    pub fn set_offset(&mut self, offset: i32) {
        self.calibration.offset = offset;
    }

    /// Current tare offset
    pub fn offset(&self) -> i32 {
        self.calibration.offset
    }

    /// Offset and scale together
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Replace offset and scale
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }
}

/// Clock one byte in, MSB first
fn shift_in<CLK: OutputPin, DATA: InputPin, D: DelayNs>(
    clock: &mut CLK,
    data: &DATA,
    delay: &mut D,
) -> u8 {
    let mut value = 0u8;
    for _ in 0..8 {
        clock.set_high();
        delay.delay_ns(CLOCK_HALF_PERIOD_NS);
        value = (value << 1) | u8::from(data.is_high());
        clock.set_low();
        delay.delay_ns(CLOCK_HALF_PERIOD_NS);
    }
    value
}

/// One clock pulse with nothing sampled
fn pulse<CLK: OutputPin, D: DelayNs>(clock: &mut CLK, delay: &mut D) {
    clock.set_high();
    delay.delay_ns(CLOCK_HALF_PERIOD_NS);
    clock.set_low();
    delay.delay_ns(CLOCK_HALF_PERIOD_NS);
}

impl<CLK, DATA, D, T, CS> LoadCell for Hx711<CLK, DATA, D, T, CS>
where
    CLK: OutputPin,
    DATA: InputPin,
    D: DelayNs,
    T: Monotonic,
    CS: CriticalSection,
{
    fn is_ready(&self) -> bool {
        Hx711::is_ready(self)
    }

    fn read(&mut self) -> i32 {
        Hx711::read(self)
    }

    fn set_gain(&mut self, gain: Gain) {
        Hx711::set_gain(self, gain);
    }

    fn gain(&self) -> Gain {
        Hx711::gain(self)
    }

    fn calibration(&self) -> Calibration {
        Hx711::calibration(self)
    }

    fn set_calibration(&mut self, calibration: Calibration) {
        Hx711::set_calibration(self, calibration);
    }

    fn power_down(&mut self) {
        Hx711::power_down(self);
    }

    fn power_up(&mut self) {
        Hx711::power_up(self);
    }

    fn read_average(&mut self, times: NonZeroU8) -> i32 {
        Hx711::read_average(self, times)
    }

    fn get_value(&mut self, times: NonZeroU8) -> f64 {
        Hx711::get_value(self, times)
    }

    fn get_units(&mut self, times: NonZeroU8) -> f32 {
        Hx711::get_units(self, times)
    }

    fn tare(&mut self, times: NonZeroU8) {
        Hx711::tare(self, times);
    }
}
