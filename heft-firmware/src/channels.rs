//! Inter-task communication
//!
//! The acquisition task publishes complete dashboards; the display task only
//! ever needs the newest one, so a `Signal` (latest value wins) is enough.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use heft_display::Dashboard;

/// Slots in the scale 1 sample window
pub const WINDOW_LEN: usize = 11;

/// Newest dashboard contents (updated by the acquisition task)
pub static DASHBOARD: Signal<CriticalSectionRawMutex, Dashboard<WINDOW_LEN>> = Signal::new();
