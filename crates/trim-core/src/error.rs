//! Error types for the control loop

use thiserror::Error;

/// Failures surfaced by a link task
///
/// None of these terminate the process: each is reported to the controller
/// as status text and only the owning link's loop exits. Unrecognized lines
/// are not errors at all; the parsers simply skip them.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Failed to establish the connection at startup
    #[error("connect to {host}:{port} failed: {source}")]
    Connect {
        /// Peer host
        host: String,
        /// Peer port
        port: u16,
        /// Underlying network failure
        #[source]
        source: std::io::Error,
    },

    /// Peer closed the connection mid-session
    #[error("connection closed by peer")]
    Closed,

    /// Any other I/O failure inside a receive loop
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
