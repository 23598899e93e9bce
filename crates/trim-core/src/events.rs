//! Unified event stream for the control loop
//!
//! Everything the presentation layer is owed arrives through a single event
//! channel: power pairs on every observed change, and free-text status for
//! band changes and connection failures. The display has no feedback into
//! the algorithm.

/// Events emitted by the controller for observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The current power readings changed
    Power {
        /// Last power reported by or commanded to the transmitter
        radio: Option<u32>,
        /// Last output power reported by the amplifier
        amp: Option<u32>,
    },

    /// Human-readable status text (band changes, link failures)
    Status {
        /// Message to display
        message: String,
    },
}
