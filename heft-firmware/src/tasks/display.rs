//! Display task
//!
//! Waits for dashboards from the acquisition task and renders them. Only
//! the newest dashboard is drawn; intermediate ones are dropped.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C1;
use sh1106::interface::I2cInterface;

use heft_display::Screen;

use crate::channels::DASHBOARD;
use crate::display::Oled;

/// OLED on I2C1 in graphics mode
pub type OledDisplay = Oled<I2cInterface<I2c<'static, I2C1, Blocking>>>;

/// Display task
#[embassy_executor::task]
pub async fn display_task(mut oled: OledDisplay) {
    info!("Display task started");

    let mut screen = Screen::new();
    let mut failures: u32 = 0;

    loop {
        let dashboard = DASHBOARD.wait().await;
        dashboard.draw(&mut screen);

        match screen.render(&mut oled) {
            Ok(()) => {
                if failures > 0 {
                    info!("Display recovered after {} failed refreshes", failures);
                    failures = 0;
                }
            }
            Err(e) => {
                // Report once, the screen stays dirty and is retried
                if failures == 0 {
                    warn!("Display refresh failed: {}", e);
                }
                failures = failures.saturating_add(1);
            }
        }
    }
}
