//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod acquisition;
pub mod display;

pub use acquisition::{acquisition_task, ScaleDriver};
pub use display::{display_task, OledDisplay};
