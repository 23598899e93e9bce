//! Controller actor
//!
//! All session mutation happens in this actor. The two link tasks feed it
//! decoded lines through a command channel; it owns the only [`Session`],
//! makes every correction decision, and hands outbound command text to the
//! radio link's writer. Single ownership stands in for a lock: the
//! keyed-and-out-of-band check and the resulting power step can never
//! interleave with an update from the other stream.
//!
//! At most one correction is issued per amplifier sample, and corrections
//! are only ever issued while the transmitter reports it is keyed.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use trim_proto::{parse_meter_power, scan_status_line, set_rfpower_command, RadioUpdate};

use crate::config::Config;
use crate::events::SessionEvent;
use crate::session::Session;

/// Commands sent to the controller actor
#[derive(Debug)]
pub enum ControllerCommand {
    /// A decoded line from the transmitter status stream
    RadioLine(String),

    /// A decoded line from the amplifier meter stream
    AmpLine(String),

    /// A link task terminated (peer closed the connection or I/O failed)
    LinkDown {
        /// Which link went down ("radio" or "amp")
        source: &'static str,
        /// Human-readable failure description
        message: String,
    },

    /// Shut down the actor
    Shutdown,
}

/// Run the controller actor.
///
/// Consumes [`ControllerCommand`]s until shutdown or until every sender is
/// dropped, emitting [`SessionEvent`]s for observers and correction command
/// text on `radio_tx`.
pub async fn run_controller(
    config: Config,
    mut cmd_rx: mpsc::Receiver<ControllerCommand>,
    event_tx: mpsc::Sender<SessionEvent>,
    radio_tx: mpsc::Sender<String>,
) {
    let mut session = Session::new(&config);
    info!(
        "controller started, targeting {}-{} W",
        session.band.min, session.band.max
    );

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            ControllerCommand::RadioLine(line) => {
                handle_radio_line(&config, &mut session, &line, &event_tx, &radio_tx).await;
            }

            ControllerCommand::AmpLine(line) => {
                handle_amp_line(&mut session, &line, &event_tx, &radio_tx).await;
            }

            ControllerCommand::LinkDown { source, message } => {
                warn!("{source} link down: {message}");
                let _ = event_tx
                    .send(SessionEvent::Status {
                        message: format!("{source} link down: {message}"),
                    })
                    .await;
            }

            ControllerCommand::Shutdown => break,
        }
    }

    info!("controller stopped");
}

/// Apply every recognized field of a transmitter status line.
async fn handle_radio_line(
    config: &Config,
    session: &mut Session,
    line: &str,
    event_tx: &mpsc::Sender<SessionEvent>,
    radio_tx: &mpsc::Sender<String>,
) {
    for update in scan_status_line(line) {
        match update {
            RadioUpdate::Frequency(freq) => {
                if let Some(band) = session.observe_frequency(&freq, config) {
                    info!("band changed, holding output at {}-{} W", band.min, band.max);
                    let _ = event_tx
                        .send(SessionEvent::Status {
                            message: format!(
                                "band changed: holding amplifier output at {}-{} W",
                                band.min, band.max
                            ),
                        })
                        .await;
                }
            }

            RadioUpdate::RfPower(watts) => {
                debug!("transmitter reports rfpower {watts}");
                session.observe_rf_power(watts);
                notify_power(session, event_tx).await;
            }

            RadioUpdate::State(token) => {
                debug!("transmitter state {token}");
                if let Some(watts) = session.observe_state(&token, config) {
                    info!("transmission ended, decaying rfpower to {watts}");
                    let _ = radio_tx.send(set_rfpower_command(watts)).await;
                }
                notify_power(session, event_tx).await;
            }
        }
    }
}

/// Apply one amplifier meter line: record the sample, issue at most one
/// correction, and report the current power pair either way.
async fn handle_amp_line(
    session: &mut Session,
    line: &str,
    event_tx: &mpsc::Sender<SessionEvent>,
    radio_tx: &mpsc::Sender<String>,
) {
    let Some(watts) = parse_meter_power(line) else {
        return;
    };

    if let Some(corrected) = session.observe_amp_power(watts) {
        debug!("amp at {watts} W, correcting rfpower to {corrected}");
        let _ = radio_tx.send(set_rfpower_command(corrected)).await;
    }

    notify_power(session, event_tx).await;
}

/// Forward the current power pair to observers.
async fn notify_power(session: &Session, event_tx: &mpsc::Sender<SessionEvent>) {
    let _ = event_tx
        .send(SessionEvent::Power {
            radio: session.radio_power,
            amp: session.amp_power,
        })
        .await;
}
