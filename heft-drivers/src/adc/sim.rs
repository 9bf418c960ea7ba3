//! Simulated HX711 for host tests
//!
//! Models the chip at the pin level: readiness on DOUT, bit shifting on
//! PD_SCK rising edges, gain selection by trailing pulse count, and the
//! power-down that follows a clock held high for more than 60 µs. Time only
//! advances through the delay provider, so tests are deterministic.

use std::cell::RefCell;
use std::collections::VecDeque;

use heft_core::gain::Gain;
use heft_hal::{CriticalSection, DelayNs, InputPin, Monotonic, OutputPin, Pull};

use super::hx711::Hx711;

/// Clock-high time after which the chip powers down
const POWER_DOWN_NS: u64 = 60_000;

/// Data bits per conversion
const DATA_EDGES: u8 = 24;

/// A conversion waiting to be read
#[derive(Debug, Clone, Copy)]
struct Pending {
    word: u32,
    ready_at_ns: u64,
}

/// A shift in progress
#[derive(Debug, Clone, Copy)]
struct Shift {
    pending: Pending,
    from_queue: bool,
    edges: u8,
    conversion_pulses: u8,
}

/// One completed read as seen by the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Raw 24-bit word shifted out
    pub word: u32,
    /// Gain pulses in effect when this conversion was taken
    pub conversion_pulses: u8,
    /// Pulses after the 24 data bits, selecting the next conversion's gain
    pub trailing_pulses: u8,
}

/// Simulated chip state, shared by the sim pins through a `RefCell`
#[derive(Debug)]
pub struct SimChip {
    samples: VecDeque<Pending>,
    repeat: Option<u32>,
    shift: Option<Shift>,
    transfers: Vec<Transfer>,
    epoch_us: u64,
    clock_high_since: u64,
    active_gain_pulses: u8,

    pub now_ns: u64,
    pub clock_high: bool,
    pub clock_configurations: u32,
    pub data_pull: Option<Pull>,
    pub powered_down: bool,
    pub in_critical: bool,
    pub critical_entries: u32,
    /// Clock edges issued outside a critical section while data was shifting
    pub unprotected_edges: u32,
    /// Readiness polls that found no conversion
    pub idle_polls: u32,
    /// Time of each idle poll
    pub poll_times_ns: Vec<u64>,
}

impl SimChip {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
            repeat: None,
            shift: None,
            transfers: Vec::new(),
            epoch_us: 0,
            clock_high_since: 0,
            active_gain_pulses: Gain::A128.pulses(),
            now_ns: 0,
            clock_high: false,
            clock_configurations: 0,
            data_pull: None,
            powered_down: false,
            in_critical: false,
            critical_entries: 0,
            unprotected_edges: 0,
            idle_polls: 0,
            poll_times_ns: Vec::new(),
        }
    }

    /// Queue a conversion that is ready immediately
    pub fn queue(&mut self, value: i32) {
        self.queue_at(value, 0);
    }

    /// Queue a conversion that becomes ready at `ready_at_ns`
    pub fn queue_at(&mut self, value: i32, ready_at_ns: u64) {
        self.samples.push_back(Pending {
            word: value as u32 & 0x00FF_FFFF,
            ready_at_ns,
        });
    }

    /// Queue a conversion from its three wire bytes, MSB first
    pub fn queue_bytes(&mut self, bytes: [u8; 3]) {
        let word = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
        self.samples.push_back(Pending {
            word,
            ready_at_ns: 0,
        });
    }

    /// Produce `value` forever once the queue is drained
    pub fn repeat(&mut self, value: i32) {
        self.repeat = Some(value as u32 & 0x00FF_FFFF);
    }

    /// Offset the monotonic clock, to exercise counter wrap-around
    pub fn set_epoch_us(&mut self, epoch_us: u64) {
        self.epoch_us = epoch_us;
    }

    /// Settle any pending shift and return every completed transfer
    pub fn finish(&mut self) -> Vec<Transfer> {
        self.settle();
        core::mem::take(&mut self.transfers)
    }

    fn now_micros(&self) -> u64 {
        self.epoch_us.wrapping_add(self.now_ns / 1_000)
    }

    fn next_ready(&self) -> Option<Pending> {
        if self.powered_down {
            return None;
        }
        match self.samples.front() {
            Some(p) if p.ready_at_ns <= self.now_ns => Some(*p),
            Some(_) => None,
            None => self.repeat.map(|word| Pending {
                word,
                ready_at_ns: 0,
            }),
        }
    }

    fn advance(&mut self, ns: u64) {
        self.now_ns += ns;
        if self.clock_high
            && !self.powered_down
            && self.now_ns - self.clock_high_since > POWER_DOWN_NS
        {
            self.powered_down = true;
            // The conversion is redone after wake-up
            if let Some(shift) = self.shift.take().filter(|s| s.from_queue) {
                self.samples.push_front(shift.pending);
            }
        }
    }

    /// Complete a shift once its gain pulses have been clocked
    fn settle(&mut self) {
        let Some(shift) = self.shift else {
            return;
        };
        if self.clock_high || shift.edges <= DATA_EDGES {
            return;
        }
        let trailing = (shift.edges - DATA_EDGES).min(3);
        self.transfers.push(Transfer {
            word: shift.pending.word,
            conversion_pulses: shift.conversion_pulses,
            trailing_pulses: trailing,
        });
        self.active_gain_pulses = trailing;
        self.shift = None;
    }

    fn rising_edge(&mut self) {
        self.clock_high = true;
        self.clock_high_since = self.now_ns;

        if self.shift.is_none() {
            let Some(pending) = self.next_ready() else {
                return;
            };
            let from_queue = self.samples.pop_front().is_some();
            self.shift = Some(Shift {
                pending,
                from_queue,
                edges: 0,
                conversion_pulses: self.active_gain_pulses,
            });
        }

        if !self.in_critical {
            self.unprotected_edges += 1;
        }
        if let Some(shift) = self.shift.as_mut() {
            shift.edges = shift.edges.saturating_add(1);
        }
    }

    fn falling_edge(&mut self) {
        self.clock_high = false;
        if self.powered_down {
            self.powered_down = false;
            self.active_gain_pulses = Gain::A128.pulses();
        }
    }

    fn data_level(&mut self) -> bool {
        if self.powered_down {
            return true;
        }
        self.settle();

        match self.shift {
            Some(shift) if shift.edges == 0 => false,
            Some(shift) if shift.edges <= DATA_EDGES => {
                let bit = DATA_EDGES - shift.edges;
                (shift.pending.word >> bit) & 1 == 1
            }
            Some(_) => true,
            None => {
                if self.next_ready().is_some() {
                    false
                } else {
                    self.idle_polls += 1;
                    self.poll_times_ns.push(self.now_ns);
                    true
                }
            }
        }
    }
}

/// PD_SCK line
pub struct SimClock<'a>(&'a RefCell<SimChip>);

/// DOUT line
pub struct SimData<'a>(&'a RefCell<SimChip>);

/// Delay provider that advances simulated time
pub struct SimDelay<'a>(&'a RefCell<SimChip>);

/// Monotonic clock reading simulated time
pub struct SimTime<'a>(&'a RefCell<SimChip>);

/// Critical section that records its extent
pub struct SimCritical<'a>(&'a RefCell<SimChip>);

impl OutputPin for SimClock<'_> {
    fn configure_output(&mut self) {
        self.0.borrow_mut().clock_configurations += 1;
    }

    fn set_high(&mut self) {
        let mut chip = self.0.borrow_mut();
        if !chip.clock_high {
            chip.rising_edge();
        }
    }

    fn set_low(&mut self) {
        let mut chip = self.0.borrow_mut();
        if chip.clock_high {
            chip.falling_edge();
        }
    }

    fn is_set_high(&self) -> bool {
        self.0.borrow().clock_high
    }
}

impl InputPin for SimData<'_> {
    fn configure_input(&mut self, pull: Pull) {
        self.0.borrow_mut().data_pull = Some(pull);
    }

    fn is_high(&self) -> bool {
        self.0.borrow_mut().data_level()
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().advance(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().advance(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().advance(u64::from(ms) * 1_000_000);
    }
}

impl Monotonic for SimTime<'_> {
    fn now_micros(&self) -> u64 {
        self.0.borrow().now_micros()
    }
}

impl CriticalSection for SimCritical<'_> {
    fn with<R>(&mut self, f: impl FnOnce() -> R) -> R {
        {
            let mut chip = self.0.borrow_mut();
            chip.in_critical = true;
            chip.critical_entries += 1;
        }
        let result = f();
        let mut chip = self.0.borrow_mut();
        chip.in_critical = false;
        chip.settle();
        result
    }
}

/// Driver wired to a simulated chip
pub type SimHx711<'a> = Hx711<SimClock<'a>, SimData<'a>, SimDelay<'a>, SimTime<'a>, SimCritical<'a>>;

impl<'a> SimHx711<'a> {
    pub fn attach(chip: &'a RefCell<SimChip>, gain: Gain) -> Self {
        Hx711::new(
            SimClock(chip),
            SimData(chip),
            SimDelay(chip),
            SimTime(chip),
            SimCritical(chip),
            gain,
        )
    }
}
