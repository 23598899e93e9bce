//! Transmitter status stream parsing and command framing
//!
//! The transmitter broadcasts its status as ASCII lines once subscribed with
//! [`SUBSCRIBE_TX_STATUS`]. There is no rigid grammar: each recognized field
//! is scanned for independently, so a line may produce zero, one, or several
//! updates. Fields that fail to parse numerically count as unrecognized and
//! are dropped.
//!
//! Outbound commands carry a session-scoped sequence number in their frame:
//! `c<seq>|<command text>\n`. The sequence is kept for wire compatibility;
//! the peer is not assumed to order or deduplicate on it.

/// Command that subscribes to transmit status broadcasts.
pub const SUBSCRIBE_TX_STATUS: &str = "sub tx all";

/// State token the transmitter reports while it is keyed.
///
/// The state field is an open token set; this is the only value the governor
/// ever interprets.
pub const STATE_TRANSMITTING: &str = "TRANSMITTING";

/// A single recognized field scanned out of a status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioUpdate {
    /// `freq=<digits>`: operating frequency, kept as the raw digit text
    /// (band selection is textual, see the session's frequency handler)
    Frequency(String),
    /// `rfpower=<watts>`: the configured transmit power
    RfPower(u32),
    /// `state=<token>`: operating state token
    State(String),
}

/// Scan a status line for recognized fields.
///
/// Fields are matched independently; a line carrying several fields yields
/// several updates, in `freq`, `rfpower`, `state` order. Lines with no
/// recognized field yield an empty vec.
pub fn scan_status_line(line: &str) -> Vec<RadioUpdate> {
    let mut updates = Vec::new();

    if let Some(digits) = field_digits(line, "freq=") {
        updates.push(RadioUpdate::Frequency(digits.to_string()));
    }

    if let Some(digits) = field_digits(line, "rfpower=") {
        if let Ok(watts) = digits.parse() {
            updates.push(RadioUpdate::RfPower(watts));
        }
    }

    if let Some(token) = field_word(line, "state=") {
        updates.push(RadioUpdate::State(token.to_string()));
    }

    updates
}

/// Frame a command for the wire: `c<seq>|<command>`, newline-terminated.
pub fn frame_command(seq: u64, command: &str) -> String {
    format!("c{seq}|{command}\n")
}

/// Build the command text that sets the configured transmit power.
pub fn set_rfpower_command(watts: u32) -> String {
    format!("transmit set rfpower {watts}")
}

/// Extract the digit run following `key`, if present and non-empty.
fn field_digits<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = &line[line.find(key)? + key.len()..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

/// Extract the word (alphanumeric or underscore) following `key`.
fn field_word<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = &line[line.find(key)? + key.len()..];
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_rfpower_field() {
        let updates = scan_status_line("S1234ABC|transmit rfpower=340 tune_power=10");
        assert_eq!(updates, vec![RadioUpdate::RfPower(340)]);
    }

    #[test]
    fn scans_state_token() {
        let updates = scan_status_line("S0|interlock state=READY reason=");
        assert_eq!(updates, vec![RadioUpdate::State("READY".to_string())]);
    }

    #[test]
    fn scans_frequency_as_text() {
        let updates = scan_status_line("S0|slice 0 freq=50313000 mode=DIGU");
        assert_eq!(
            updates,
            vec![RadioUpdate::Frequency("50313000".to_string())]
        );
    }

    #[test]
    fn one_line_can_carry_several_fields() {
        let updates = scan_status_line("freq=14074000 rfpower=345 state=TRANSMITTING");
        assert_eq!(
            updates,
            vec![
                RadioUpdate::Frequency("14074000".to_string()),
                RadioUpdate::RfPower(345),
                RadioUpdate::State("TRANSMITTING".to_string()),
            ]
        );
    }

    #[test]
    fn unrecognized_lines_yield_nothing() {
        assert!(scan_status_line("V1.4.0.0").is_empty());
        assert!(scan_status_line("M10000001|Client connected").is_empty());
        assert!(scan_status_line("").is_empty());
    }

    #[test]
    fn empty_field_values_are_a_miss() {
        assert!(scan_status_line("rfpower=").is_empty());
        assert!(scan_status_line("state= rfpower=x").is_empty());
    }

    #[test]
    fn oversized_power_is_a_miss() {
        // Does not fit in u32 - dropped like any other unparseable field
        assert!(scan_status_line("rfpower=99999999999999999999").is_empty());
    }

    #[test]
    fn frames_commands_with_sequence() {
        assert_eq!(frame_command(1, SUBSCRIBE_TX_STATUS), "c1|sub tx all\n");
        assert_eq!(
            frame_command(2, &set_rfpower_command(341)),
            "c2|transmit set rfpower 341\n"
        );
    }
}
