//! Transmit Power Control Engine
//!
//! This crate provides the closed-loop control core of txtrim: it bridges a
//! transmitter's status stream and an amplifier's meter stream, and nudges
//! the transmitter's configured power one watt at a time to hold the
//! amplifier's output inside a per-band target window.
//!
//! # Architecture
//!
//! The engine is built from three kinds of tasks, all communicating over
//! channels:
//!
//! - [`RadioLink`] and [`AmpLink`] each own one line-oriented connection and
//!   run an independent receive loop. The radio link also frames and writes
//!   outbound commands, tagging each with a session-scoped sequence number.
//! - [`run_controller`] is a single actor that owns the only [`Session`].
//!   Both links feed it decoded lines; it applies every state mutation and
//!   makes every correction decision, so the out-of-band check and the
//!   resulting power step can never interleave with a mutation from the
//!   other stream. No locks exist anywhere.
//! - Observers consume a unified [`SessionEvent`] stream: power pairs on
//!   every observed change, free-text status on band changes and link
//!   failures. That stream is the engine's entire obligation to the
//!   presentation layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use tokio::sync::{mpsc, oneshot};
//! use trim_core::{run_controller, AmpLink, Config, RadioLink};
//!
//! # async fn wire() -> Result<(), trim_core::LinkError> {
//! let config = Config::default();
//!
//! let (ctrl_tx, ctrl_rx) = mpsc::channel(256);
//! let (event_tx, _event_rx) = mpsc::channel(256);
//! let (radio_cmd_tx, radio_cmd_rx) = mpsc::channel(64);
//!
//! tokio::spawn(run_controller(config.clone(), ctrl_rx, event_tx, radio_cmd_tx));
//!
//! let radio = trim_core::connect(&config.radio_host, config.radio_port).await?;
//! let (_radio_stop, radio_stop_rx) = oneshot::channel();
//! tokio::spawn(RadioLink::new(radio, ctrl_tx.clone()).run(radio_stop_rx, radio_cmd_rx));
//!
//! let amp = trim_core::connect(&config.amp_host, config.amp_port).await?;
//! let (_amp_stop, amp_stop_rx) = oneshot::channel();
//! tokio::spawn(AmpLink::new(amp, ctrl_tx).run(amp_stop_rx));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod link;
pub mod session;

pub use config::Config;
pub use controller::{run_controller, ControllerCommand};
pub use error::LinkError;
pub use events::SessionEvent;
pub use link::{connect, AmpLink, RadioLink};
pub use session::{BandLimits, Session};
