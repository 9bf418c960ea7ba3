//! Load cell acquisition task
//!
//! Owns both converters. Every `refresh_ms` it polls each chip, reads the
//! ones that are ready and publishes a fresh dashboard:
//! - every scale line shows its latest raw and calibrated value
//! - scale 1 raw readings also feed a sliding window whose probe sample is
//!   checked against the window average; a deviating window is kept as the
//!   displayed history

use core::num::NonZeroU8;

use defmt::*;
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};

use heft_core::config::{HeftConfig, ScaleConfig};
use heft_core::gain::Gain;
use heft_core::window::DeviationMonitor;
use heft_core::LoadCell;
use heft_display::Dashboard;
use heft_drivers::adc::hx711::{DEFAULT_AVERAGE, DEFAULT_TIMEOUT_MS};
use heft_drivers::Hx711;
use heft_hal_rp2040::{EmbassyClock, FlexPin};

use crate::channels::{DASHBOARD, WINDOW_LEN};

/// Converter wired to two GPIO lines
pub type ScaleDriver = Hx711<FlexPin<'static>, FlexPin<'static>, Delay, EmbassyClock>;

/// Poll interval while waiting for the first conversion at boot
const BOOT_POLL_MS: u64 = 1;

/// Give up on a chip that has not converted within this time at boot
const BOOT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS as u64);

/// Builds averages from one reading per ready poll
///
/// Keeps the executor free instead of blocking in `read_average` for
/// several conversion periods.
struct Accumulator {
    target: NonZeroU8,
    count: u8,
    sum: i64,
}

impl Accumulator {
    fn new(target: NonZeroU8) -> Self {
        Self {
            target,
            count: 0,
            sum: 0,
        }
    }

    /// Add a reading; returns the truncated average once `target` are in
    fn add(&mut self, raw: i32) -> Option<i32> {
        self.sum += i64::from(raw);
        self.count += 1;
        if self.count < self.target.get() {
            return None;
        }
        let average = self.sum / i64::from(self.count);
        self.count = 0;
        self.sum = 0;
        Some(average as i32)
    }
}

/// Wait for a conversion without blocking the executor
async fn wait_ready<L: LoadCell>(cell: &L, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !cell.is_ready() {
        if Instant::now() >= deadline {
            return false;
        }
        Timer::after_millis(BOOT_POLL_MS).await;
    }
    true
}

/// Wait for the next conversion and read it without blocking the executor
async fn next_reading<L: LoadCell>(cell: &mut L) -> Option<i32> {
    if wait_ready(cell, BOOT_TIMEOUT).await {
        Some(cell.read())
    } else {
        None
    }
}

/// Apply the configuration and bring a converter to its first usable reading
///
/// Returns the first raw reading at the configured gain, or `None` if the
/// chip never became ready. Every read waits asynchronously first, so
/// `read` only runs the short bit transfer.
async fn bring_up<L: LoadCell>(index: usize, cell: &mut L, config: &ScaleConfig) -> Option<i32> {
    cell.set_gain(config.gain);
    cell.set_calibration(config.calibration);

    let Some(mut first) = next_reading(cell).await else {
        warn!("Scale {} ({}) not responding", index + 1, config.label.as_str());
        return None;
    };

    // The chip powers up on channel A x128 and the first read only programs
    // the configured gain
    if config.gain != Gain::A128 {
        debug!("Scale {} discarding first conversion", index + 1);
        first = next_reading(cell).await?;
    }

    if config.tare_on_boot {
        let mut tare = Accumulator::new(DEFAULT_AVERAGE);
        let offset = loop {
            let raw = next_reading(cell).await?;
            if let Some(average) = tare.add(raw) {
                break average;
            }
        };
        let mut calibration = cell.calibration();
        calibration.offset = offset;
        cell.set_calibration(calibration);
        info!("Scale {} tared at {}", index + 1, offset);
    }

    let calibration = cell.calibration();
    info!(
        "Scale {} ({}) ready: gain {}, offset {}, scale {}",
        index + 1,
        config.label.as_str(),
        config.gain.factor(),
        calibration.offset,
        calibration.scale
    );

    Some(first)
}

/// Acquisition task
#[embassy_executor::task]
pub async fn acquisition_task(mut scales: [ScaleDriver; 2], config: HeftConfig) {
    info!("Acquisition task started");

    let mut dashboard: Dashboard<WINDOW_LEN> = Dashboard::new();
    let mut accumulators: [Accumulator; 2] =
        core::array::from_fn(|i| Accumulator::new(config.scale(i).samples()));
    let mut monitor: DeviationMonitor<WINDOW_LEN> =
        DeviationMonitor::new(config.display.deviation_percent);

    for (index, scale) in scales.iter_mut().enumerate() {
        let scale_config = config.scale(index);
        dashboard.add_scale(scale_config.label.as_str());

        if let Some(first) = bring_up(index, scale, &scale_config).await {
            if index == 0 {
                monitor.prime(first);
            }
        }
    }
    DASHBOARD.signal(dashboard.clone());

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.display.refresh_ms)));

    loop {
        ticker.next().await;

        let mut changed = false;
        for (index, scale) in scales.iter_mut().enumerate() {
            if !scale.is_ready() {
                continue;
            }

            let raw = scale.read();
            if index == 0 {
                let summary = monitor.push(raw);
                dashboard.set_summary(summary);
                if summary.deviates {
                    if let Some(snapshot) = monitor.snapshot() {
                        dashboard.set_history(snapshot);
                    }
                    debug!(
                        "Probe {} deviates from average {}",
                        summary.probe.unwrap_or(raw),
                        summary.average
                    );
                }
                changed = true;
            }

            if let Some(average) = accumulators[index].add(raw) {
                let units = scale.calibration().units(average);
                dashboard.set_reading(index, average, units);
                changed = true;
            }
        }

        if changed {
            DASHBOARD.signal(dashboard.clone());
        }
    }
}
