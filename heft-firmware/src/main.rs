//! Heft - Load Cell Readout Firmware
//!
//! Example firmware for RP2040 boards with two HX711 load cell converters
//! and an SH1106 OLED. Scale settings come from the compiled-in
//! `scales.toml`.
//!
//! Wiring:
//! - Scale 1: DOUT GP21, PD_SCK GP22
//! - Scale 2: DOUT GP5, PD_SCK GP2
//! - OLED:    SDA GP6, SCL GP7 (I2C1)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_time::Delay;
use sh1106::prelude::*;
use sh1106::Builder;
use {defmt_rtt as _, panic_probe as _};

use heft_drivers::Hx711;
use heft_hal_rp2040::{EmbassyClock, FlexPin, InterruptFree};

mod channels;
mod config;
mod display;
mod tasks;

use crate::display::Oled;
use crate::tasks::{acquisition_task, display_task, ScaleDriver};

/// OLED I2C clock
const OLED_I2C_FREQUENCY: u32 = 400_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Heft firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Gain and calibration are applied by the acquisition task
    let scale1: ScaleDriver = Hx711::new(
        FlexPin::new(p.PIN_22),
        FlexPin::new(p.PIN_21),
        Delay,
        EmbassyClock,
        InterruptFree,
        config.scale(0).gain,
    );
    let scale2: ScaleDriver = Hx711::new(
        FlexPin::new(p.PIN_2),
        FlexPin::new(p.PIN_5),
        Delay,
        EmbassyClock,
        InterruptFree,
        config.scale(1).gain,
    );

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = OLED_I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C1, p.PIN_7, p.PIN_6, i2c_config);
    let graphics: GraphicsMode<_> = Builder::new().connect_i2c(i2c).into();

    match Oled::new(graphics) {
        Ok(oled) => {
            info!("OLED initialized");
            spawner.spawn(display_task(oled)).unwrap();
        }
        Err(e) => {
            // Keep measuring without a display
            error!("OLED init failed: {}, running without display", e);
        }
    }

    spawner
        .spawn(acquisition_task([scale1, scale2], config))
        .unwrap();

    info!("All tasks spawned");
}
