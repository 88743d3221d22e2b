//! Build script for spritelink-firmware
//!
//! - Sets up linker search paths for memory.x and the link scripts
//! - Validates link.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lines from the frame edge to the first visible line (VSYNC + VBACK)
const LINES_BEFORE_ACTIVE: i64 = 27;

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

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate link.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=link.toml");

    let config_path = Path::new("link.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read link.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in link.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_bus(&config, &mut errors);
    validate_sync(&config, &mut errors);
    validate_project(&config, &mut errors);
    validate_demo(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid link configuration", &errors);
    }

    println!("cargo:warning=link.toml validated successfully");
}

/// Print a boxed error report and abort the build
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| format!("║  • {:<62} ║", truncate(line, 62)))
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// Shorten to at most `width` characters, counting chars rather than bytes
fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() > width {
        let head: String = line.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (name, value) in table {
        if !["bus", "sync", "project", "demo"].contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }

    if config.get("bus").is_none() {
        errors.push("missing [bus] section".to_string());
    }
}

/// Integer field in range, if present
fn check_int(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match config.get(section).and_then(|s| s.get(key)) {
        None => {}
        Some(toml::Value::Integer(v)) if range.contains(v) => {}
        Some(toml::Value::Integer(_)) => errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "bus", "frequency_hz", 1..=u32::MAX as i64, errors);

    let bus = config.get("bus");
    if let Some(mode) = bus.and_then(|b| b.get("mode")) {
        let mode = match mode {
            toml::Value::Integer(m) => Some(*m),
            toml::Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        };
        match mode {
            Some(0 | 1) => {}
            Some(2 | 3) => errors.push("[bus] clock idling high (mode 2/3) is not supported".to_string()),
            _ => errors.push("[bus] mode must be 0, 1, 2 or 3".to_string()),
        }
    }

    match bus.and_then(|b| b.get("cpol")) {
        None | Some(toml::Value::Boolean(false)) => {}
        Some(toml::Value::Boolean(true)) => {
            errors.push("[bus] cpol = true is not supported".to_string())
        }
        Some(_) => errors.push("[bus] cpol must be a boolean".to_string()),
    }

    if let Some(cpha) = bus.and_then(|b| b.get("cpha")) {
        if !cpha.is_bool() {
            errors.push("[bus] cpha must be a boolean".to_string());
        }
    }
}

fn validate_sync(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "sync", "line_offset", 0..=LINES_BEFORE_ACTIVE - 1, errors);
}

fn validate_project(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "project", "clock_hz", 1..=u32::MAX as i64, errors);
    check_int(config, "project", "reduced_clock_hz", 1..=u32::MAX as i64, errors);
}

fn validate_demo(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "demo", "dwell_ms", 0..=u32::MAX as i64, errors);
    check_int(config, "demo", "orbit_rounds", 1..=255, errors);
    check_int(config, "demo", "orbit_margin", 0..=255, errors);
}
