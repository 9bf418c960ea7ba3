//! Simple TOML parser for scale configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the scale configuration. It does NOT support the full TOML spec and
//! needs no allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - `[scale.<name>]` and `[display]` section headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings and escape sequences
//! - Dotted keys outside section headers

use heapless::String;

use super::scale::{HeftConfig, ScaleConfig, MAX_LABEL_LEN};
use crate::gain::Gain;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid or duplicate section header
    InvalidSection,
    /// Invalid value type or out-of-range value
    InvalidValue,
    /// Key not recognised in the current section
    UnknownKey,
    /// More `[scale.*]` sections than the board supports
    TooManyScales,
    /// Name or label longer than the display allows
    LabelTooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy)]
enum Section {
    Root,
    Scale(usize),
    Display,
}

/// A parsed right-hand side
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value<'a> {
    Str(&'a str),
    Int(i64),
    Float(f32),
    Bool(bool),
}

/// Parse TOML configuration into `HeftConfig`
pub fn parse_config(input: &str) -> Result<HeftConfig, ConfigError> {
    let mut config = HeftConfig::empty();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            section = open_section(&mut config, &line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        let value = parse_value(value)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

/// Parse a section header and register the section it opens
fn open_section(config: &mut HeftConfig, header: &str) -> Result<Section, ConfigError> {
    let header = header.trim();

    if header == "display" {
        return Ok(Section::Display);
    }

    let name = header
        .strip_prefix("scale.")
        .map(str::trim)
        .ok_or(ConfigError::InvalidSection)?;

    if name.is_empty() || name.contains('.') {
        return Err(ConfigError::InvalidSection);
    }
    if name.len() > MAX_LABEL_LEN {
        return Err(ConfigError::LabelTooLong);
    }
    if config.find_scale(name).is_some() {
        return Err(ConfigError::InvalidSection);
    }

    config
        .scales
        .push(ScaleConfig::named(name))
        .map_err(|_| ConfigError::TooManyScales)?;

    Ok(Section::Scale(config.scales.len() - 1))
}

/// Apply a key/value pair to the current section
fn apply_value(
    config: &mut HeftConfig,
    section: Section,
    key: &str,
    value: Value<'_>,
) -> Result<(), ConfigError> {
    match section {
        Section::Root => Err(ConfigError::UnknownKey),
        Section::Display => {
            let display = &mut config.display;
            match key {
                "refresh_ms" => {
                    display.refresh_ms = int_in_range(value, 1, 60_000)? as u32;
                }
                "deviation_percent" => {
                    display.deviation_percent = int_in_range(value, 1, 100)? as u8;
                }
                _ => return Err(ConfigError::UnknownKey),
            }
            Ok(())
        }
        Section::Scale(index) => {
            let scale = config
                .scales
                .get_mut(index)
                .ok_or(ConfigError::InvalidSection)?;
            match key {
                "label" => {
                    let Value::Str(text) = value else {
                        return Err(ConfigError::InvalidValue);
                    };
                    let mut label = String::new();
                    label
                        .push_str(text)
                        .map_err(|_| ConfigError::LabelTooLong)?;
                    scale.label = label;
                }
                "gain" => {
                    let factor = int_in_range(value, 0, 255)? as u8;
                    scale.gain = Gain::from_factor(factor).ok_or(ConfigError::InvalidValue)?;
                }
                "samples" => {
                    scale.samples = int_in_range(value, 1, 255)? as u8;
                }
                "offset" => {
                    scale.calibration.offset =
                        int_in_range(value, i64::from(i32::MIN), i64::from(i32::MAX))? as i32;
                }
                "scale" => {
                    let factor = match value {
                        Value::Float(f) => f,
                        Value::Int(i) => i as f32,
                        _ => return Err(ConfigError::InvalidValue),
                    };
                    if factor == 0.0 || !factor.is_finite() {
                        return Err(ConfigError::InvalidValue);
                    }
                    scale.calibration.scale = factor;
                }
                "tare_on_boot" => {
                    let Value::Bool(flag) = value else {
                        return Err(ConfigError::InvalidValue);
                    };
                    scale.tare_on_boot = flag;
                }
                _ => return Err(ConfigError::UnknownKey),
            }
            Ok(())
        }
    }
}

fn int_in_range(value: Value<'_>, min: i64, max: i64) -> Result<i64, ConfigError> {
    match value {
        Value::Int(i) if (min..=max).contains(&i) => Ok(i),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Remove a trailing `#` comment, ignoring `#` inside quoted strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a scalar value
fn parse_value(raw: &str) -> Result<Value<'_>, ConfigError> {
    if let Some(rest) = raw.strip_prefix('"') {
        let text = rest.strip_suffix('"').ok_or(ConfigError::InvalidValue)?;
        if text.contains('"') {
            return Err(ConfigError::InvalidValue);
        }
        return Ok(Value::Str(text));
    }

    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    if raw.contains(['.', 'e', 'E']) {
        return raw
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| ConfigError::InvalidValue);
    }

    raw.parse::<i64>()
        .map(Value::Int)
        .map_err(|_| ConfigError::InvalidValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::scale::{DEFAULT_DEVIATION_PERCENT, DEFAULT_REFRESH_MS};

    const FULL: &str = r#"
# Two load cells on the bench
[scale.left]
label = "LEFT"      # shown on the display
gain = 128
samples = 4
offset = -8388
scale = 420.5
tare_on_boot = true

[scale.right]
gain = 32

[display]
refresh_ms = 25
deviation_percent = 15
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.scales.len(), 2);

        let left = &config.scales[0];
        assert_eq!(left.name.as_str(), "left");
        assert_eq!(left.label.as_str(), "LEFT");
        assert_eq!(left.gain, Gain::A128);
        assert_eq!(left.samples, 4);
        assert_eq!(left.calibration.offset, -8388);
        assert_eq!(left.calibration.scale, 420.5);
        assert!(left.tare_on_boot);

        let right = config.find_scale("right").unwrap();
        assert_eq!(right.label.as_str(), "right");
        assert_eq!(right.gain, Gain::B32);
        assert_eq!(right.samples, 1);
        assert!(!right.tare_on_boot);

        assert_eq!(config.display.refresh_ms, 25);
        assert_eq!(config.display.deviation_percent, 15);
    }

    #[test]
    fn test_empty_input_uses_defaults() {
        let config = parse_config("# nothing here\n\n").unwrap();
        assert!(config.scales.is_empty());
        assert_eq!(config.display.refresh_ms, DEFAULT_REFRESH_MS);
        assert_eq!(config.display.deviation_percent, DEFAULT_DEVIATION_PERCENT);
    }

    #[test]
    fn test_integer_scale_accepted() {
        let config = parse_config("[scale.a]\nscale = 2\n").unwrap();
        assert_eq!(config.scales[0].calibration.scale, 2.0);
    }

    #[test]
    fn test_hash_inside_string() {
        let config = parse_config("[scale.a]\nlabel = \"#1\" # comment\n").unwrap();
        assert_eq!(config.scales[0].label.as_str(), "#1");
    }

    #[test]
    fn test_invalid_gain() {
        let result = parse_config("[scale.a]\ngain = 100\n");
        assert_eq!(result, Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let result = parse_config("[scale.a]\nsamples = 0\n");
        assert_eq!(result, Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let result = parse_config("[scale.a]\nscale = 0.0\n");
        assert_eq!(result, Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_too_many_scales() {
        let result = parse_config("[scale.a]\n[scale.b]\n[scale.c]\n");
        assert_eq!(result, Err(ConfigError::TooManyScales));
    }

    #[test]
    fn test_duplicate_scale() {
        let result = parse_config("[scale.a]\n[scale.a]\n");
        assert_eq!(result, Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_unknown_section_and_key() {
        assert_eq!(
            parse_config("[tare.a]\n"),
            Err(ConfigError::InvalidSection)
        );
        assert_eq!(
            parse_config("[scale.a]\ncolour = 3\n"),
            Err(ConfigError::UnknownKey)
        );
        assert_eq!(parse_config("gain = 128\n"), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_label_too_long() {
        assert_eq!(
            parse_config("[scale.a]\nlabel = \"much too long\"\n"),
            Err(ConfigError::LabelTooLong)
        );
        assert_eq!(
            parse_config("[scale.much_too_long]\n"),
            Err(ConfigError::LabelTooLong)
        );
    }

    #[test]
    fn test_wrong_value_types() {
        assert_eq!(
            parse_config("[scale.a]\ntare_on_boot = 1\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[scale.a]\nlabel = 7\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[scale.a]\nlabel = \"open\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[scale.a]\ngain\n"),
            Err(ConfigError::InvalidValue)
        );
    }
}
