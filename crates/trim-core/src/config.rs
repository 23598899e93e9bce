//! Loop configuration
//!
//! Connection endpoints and tuning constants for one governor session. The
//! defaults match the station this was built for; a JSON file can override
//! them (see the console crate). There is deliberately no CLI surface.

use serde::{Deserialize, Serialize};

/// Configuration for one governor session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Transmitter host
    #[serde(default = "default_radio_host")]
    pub radio_host: String,
    /// Transmitter status/command port
    #[serde(default = "default_radio_port")]
    pub radio_port: u16,
    /// Amplifier host
    #[serde(default = "default_amp_host")]
    pub amp_host: String,
    /// Amplifier telemetry port
    #[serde(default = "default_amp_port")]
    pub amp_port: u16,
    /// Target ceiling for all bands except the high-power band, in watts
    #[serde(default = "default_ceiling")]
    pub default_ceiling: u32,
    /// Target ceiling on the 50 MHz band, in watts
    #[serde(default = "default_high_ceiling")]
    pub high_ceiling: u32,
    /// Width of the target window below the ceiling, in watts
    #[serde(default = "default_band_margin")]
    pub band_margin: u32,
    /// Watts stepped off the configured power when a transmission ends
    #[serde(default = "default_decay_step")]
    pub decay_step: u32,
    /// Lowest power the end-of-transmission decay will set
    #[serde(default = "default_decay_floor")]
    pub decay_floor: u32,
}

fn default_radio_host() -> String {
    "192.168.0.30".to_string()
}

fn default_radio_port() -> u16 {
    4992
}

fn default_amp_host() -> String {
    "192.168.0.11".to_string()
}

fn default_amp_port() -> u16 {
    4626
}

fn default_ceiling() -> u32 {
    350
}

fn default_high_ceiling() -> u32 {
    500
}

fn default_band_margin() -> u32 {
    20
}

fn default_decay_step() -> u32 {
    4
}

fn default_decay_floor() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radio_host: default_radio_host(),
            radio_port: default_radio_port(),
            amp_host: default_amp_host(),
            amp_port: default_amp_port(),
            default_ceiling: default_ceiling(),
            high_ceiling: default_high_ceiling(),
            band_margin: default_band_margin(),
            decay_step: default_decay_step(),
            decay_floor: default_decay_floor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"radio_host": "10.0.0.5", "default_ceiling": 300}"#).unwrap();
        assert_eq!(config.radio_host, "10.0.0.5");
        assert_eq!(config.default_ceiling, 300);
        assert_eq!(config.radio_port, 4992);
        assert_eq!(config.band_margin, 20);
    }
}
