//! Amplifier meter stream parsing
//!
//! The amplifier pushes telemetry lines; the only one the governor reads is
//! the instantaneous output power meter. Everything else is skipped.

/// Marker preceding the output power reading.
const POWER_MARKER: &str = "amp::meter::Power::";

/// Extract the instantaneous output power from a meter line.
///
/// Returns `None` for lines without the marker or with a non-numeric value;
/// both count as unrecognized telemetry and are ignored upstream.
pub fn parse_meter_power(line: &str) -> Option<u32> {
    let rest = &line[line.find(POWER_MARKER)? + POWER_MARKER.len()..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}
