//! Wire protocol for the txtrim power governor
//!
//! This crate provides parsing and framing for the two newline-delimited
//! ASCII streams the governor speaks:
//!
//! - **Transmitter status stream**: loosely structured status lines carrying
//!   `freq=`, `rfpower=` and `state=` fields. Commands back to the
//!   transmitter are framed as `c<seq>|<command>` with a trailing newline.
//! - **Amplifier meter stream**: telemetry lines carrying instantaneous
//!   output power as `amp::meter::Power::<watts>`.
//!
//! Both streams are intentionally tolerant: each recognized field is scanned
//! for independently, a single line may carry several fields (or none), and
//! anything unrecognized is skipped so newer firmware can add fields without
//! breaking the governor.
//!
//! # Example
//!
//! ```rust
//! use trim_proto::{scan_status_line, frame_command, RadioUpdate};
//!
//! let updates = scan_status_line("S5E2B4C|transmit rfpower=340 state=TRANSMITTING");
//! assert_eq!(
//!     updates,
//!     vec![
//!         RadioUpdate::RfPower(340),
//!         RadioUpdate::State("TRANSMITTING".to_string()),
//!     ]
//! );
//!
//! assert_eq!(frame_command(2, "transmit set rfpower 341"), "c2|transmit set rfpower 341\n");
//! ```

pub mod amp;
pub mod radio;

pub use amp::parse_meter_power;
pub use radio::{
    frame_command, scan_status_line, set_rfpower_command, RadioUpdate, STATE_TRANSMITTING,
    SUBSCRIBE_TX_STATUS,
};
