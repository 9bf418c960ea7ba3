//! Configuration loading
//!
//! The configuration is compiled in from `scales.toml` (validated by the
//! build script) and parsed at boot by the `no_std` parser in `heft-core`.

use defmt::*;

use heft_core::config::{parse_config, HeftConfig};

/// Embedded configuration (compiled into firmware)
/// Edit scales.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../scales.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> HeftConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) if config.scales.is_empty() => {
            warn!("scales.toml has no [scale.*] sections, using default scales");
            HeftConfig {
                display: config.display,
                ..HeftConfig::default()
            }
        }
        Ok(config) => {
            info!(
                "Loaded {} scale(s), refresh {} ms",
                config.scales.len(),
                config.display.refresh_ms
            );
            config
        }
        Err(e) => {
            warn!("scales.toml rejected: {}, using defaults", e);
            HeftConfig::default()
        }
    }
}
