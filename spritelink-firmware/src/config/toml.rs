//! Simple TOML parser for link configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the link configuration. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Integers with `_` separators and `0x` prefixes
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and tables of any kind
//! - Multi-line strings
//! - Floats and datetimes
//!
//! Unknown keys are ignored; unknown sections are an error.

use spritelink_core::config::LinkConfig;
use spritelink_hal::{Mode, Phase, Polarity};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Integer does not fit the field
    OutOfRange,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Sync,
    Project,
    Demo,
}

/// Parse TOML text into a [`LinkConfig`], starting from the defaults
pub fn parse_config(input: &str) -> Result<LinkConfig, ParseError> {
    let mut config = LinkConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = strip_comment(header);
            let header = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "bus" => Ok(Section::Bus),
        "sync" => Ok(Section::Sync),
        "project" => Ok(Section::Project),
        "demo" => Ok(Section::Demo),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut LinkConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Bus => match key {
            "frequency_hz" => config.bus.frequency_hz = parse_u32(value)?,
            "cpol" => {
                config.bus.polarity = if parse_bool(value)? {
                    Polarity::IdleHigh
                } else {
                    Polarity::IdleLow
                }
            }
            "cpha" => {
                config.bus.phase = if parse_bool(value)? {
                    Phase::CaptureOnSecondTransition
                } else {
                    Phase::CaptureOnFirstTransition
                }
            }
            "mode" => {
                let (polarity, phase) = parse_mode(value)?;
                config.bus.polarity = polarity;
                config.bus.phase = phase;
            }
            _ => {} // Ignore unknown keys
        },
        Section::Sync => match key {
            "line_offset" => config.sync.line_offset = parse_u32(value)?,
            _ => {}
        },
        Section::Project => match key {
            "clock_hz" => config.project.clock_hz = parse_u32(value)?,
            "reduced_clock_hz" => config.project.reduced_clock_hz = parse_u32(value)?,
            _ => {}
        },
        Section::Demo => match key {
            "dwell_ms" => config.demo.dwell_ms = parse_u32(value)?,
            "orbit_rounds" => config.demo.orbit_rounds = narrow(parse_u32(value)?)?,
            "orbit_margin" => config.demo.orbit_margin = narrow(parse_u32(value)?)?,
            _ => {}
        },
        Section::Root => {}
    }
    Ok(())
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value.trim(),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an unsigned integer, allowing `_` separators and a `0x` prefix
fn parse_u32(value: &str) -> Result<u32, ParseError> {
    let (digits, radix) = match value.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    let mut result: u32 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        if c == '_' && seen_digit {
            continue;
        }
        let digit = c.to_digit(radix).ok_or(ParseError::InvalidValue)?;
        result = result
            .checked_mul(radix)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ParseError::OutOfRange)?;
        seen_digit = true;
    }

    if !seen_digit {
        return Err(ParseError::InvalidValue);
    }
    Ok(result)
}

fn narrow(value: u32) -> Result<u8, ParseError> {
    u8::try_from(value).map_err(|_| ParseError::OutOfRange)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse an SPI mode number, quoted or bare ("1", 1)
fn parse_mode(value: &str) -> Result<(Polarity, Phase), ParseError> {
    let mode = match parse_string(value) {
        "0" => Mode::Mode0,
        "1" => Mode::Mode1,
        "2" => Mode::Mode2,
        "3" => Mode::Mode3,
        _ => return Err(ParseError::InvalidValue),
    };
    Ok(mode.into())
}
