//! Build script for heft-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates scales.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keep in sync with `heft_core::config::MAX_SCALES`
const MAX_SCALES: usize = 2;

/// Keep in sync with `heft_core::config::MAX_LABEL_LEN`
const MAX_LABEL_LEN: usize = 8;

const SCALE_KEYS: &[&str] = &["label", "gain", "samples", "offset", "scale", "tare_on_boot"];
const DISPLAY_KEYS: &[&str] = &["refresh_ms", "deviation_percent"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate scales.toml at compile time
///
/// The firmware parser rejects the same mistakes at boot, but falls back to
/// defaults. Catching them here turns a silent fallback into a build error.
fn validate_config() {
    println!("cargo:rerun-if-changed=scales.toml");

    let config_path = Path::new("scales.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: scales.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a scales.toml configuration file.           ║\n\
            ║  Please create one in the heft-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read scales.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in scales.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_scales(&config, &mut errors);
    validate_display(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid scale configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=scales.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only `[scale.*]` and `[display]` are known; no top-level keys
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        match (name.as_str(), value) {
            ("scale", toml::Value::Table(_)) | ("display", toml::Value::Table(_)) => {}
            ("scale", _) | ("display", _) => errors.push(format!("'{}' must be a table", name)),
            _ => errors.push(format!("unknown section or key '{}'", name)),
        }
    }
}

fn validate_scales(config: &toml::Value, errors: &mut Vec<String>) {
    let scales = match config.get("scale") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    if scales.len() > MAX_SCALES {
        errors.push(format!(
            "{} scales configured, the board has {}",
            scales.len(),
            MAX_SCALES
        ));
    }

    for (name, scale) in scales {
        if name.len() > MAX_LABEL_LEN {
            errors.push(format!(
                "[scale.{}] name longer than {} characters",
                name, MAX_LABEL_LEN
            ));
        }

        let scale = match scale {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[scale.{}] must be a table", name));
                continue;
            }
        };

        for key in scale.keys() {
            if !SCALE_KEYS.contains(&key.as_str()) {
                errors.push(format!("[scale.{}] unknown key '{}'", name, key));
            }
        }

        match scale.get("label") {
            Some(toml::Value::String(label)) if label.len() > MAX_LABEL_LEN => errors.push(
                format!("[scale.{}] label longer than {} characters", name, MAX_LABEL_LEN),
            ),
            Some(toml::Value::String(_)) | None => {}
            Some(_) => errors.push(format!("[scale.{}] label must be a string", name)),
        }

        match scale.get("gain") {
            Some(toml::Value::Integer(128 | 64 | 32)) | None => {}
            Some(_) => errors.push(format!("[scale.{}] gain must be 128, 64 or 32", name)),
        }

        match scale.get("samples") {
            Some(toml::Value::Integer(n)) if (1..=255).contains(n) => {}
            None => {}
            Some(_) => errors.push(format!("[scale.{}] samples must be 1-255", name)),
        }

        match scale.get("offset") {
            Some(toml::Value::Integer(n)) if i32::try_from(*n).is_ok() => {}
            None => {}
            Some(_) => errors.push(format!("[scale.{}] offset must be a 32-bit integer", name)),
        }

        match scale.get("scale") {
            Some(toml::Value::Float(f)) if *f != 0.0 && f.is_finite() => {}
            Some(toml::Value::Integer(n)) if *n != 0 => {}
            None => {}
            Some(_) => errors.push(format!("[scale.{}] scale must be a non-zero number", name)),
        }

        match scale.get("tare_on_boot") {
            Some(toml::Value::Boolean(_)) | None => {}
            Some(_) => errors.push(format!("[scale.{}] tare_on_boot must be true/false", name)),
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let display = match config.get("display") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    for key in display.keys() {
        if !DISPLAY_KEYS.contains(&key.as_str()) {
            errors.push(format!("[display] unknown key '{}'", key));
        }
    }

    match display.get("refresh_ms") {
        Some(toml::Value::Integer(n)) if (1..=60_000).contains(n) => {}
        None => {}
        Some(_) => errors.push("[display] refresh_ms must be 1-60000".to_string()),
    }

    match display.get("deviation_percent") {
        Some(toml::Value::Integer(n)) if (1..=100).contains(n) => {}
        None => {}
        Some(_) => errors.push("[display] deviation_percent must be 1-100".to_string()),
    }
}
