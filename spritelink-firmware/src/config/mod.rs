//! Link configuration loading
//!
//! The configuration is compiled in from `link.toml` (already checked by
//! build.rs). It is still parsed and validated against the running system
//! clock here, falling back to the built-in defaults on any failure.

use defmt::*;

use spritelink_core::config::LinkConfig;

pub mod toml;

use self::toml::parse_config;

/// Embedded configuration (compiled into firmware)
/// Edit link.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../link.toml");

/// Parse and validate the embedded configuration
pub fn load(system_hz: u32) -> LinkConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("link.toml parse failed: {:?}, using defaults", e);
            return LinkConfig::default();
        }
    };

    match config.validate(system_hz) {
        Ok(()) => {
            info!("Loaded configuration from link.toml");
            config
        }
        Err(e) => {
            error!("link.toml rejected: {:?}, using defaults", e);
            LinkConfig::default()
        }
    }
}
