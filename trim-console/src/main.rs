//! txtrim console front end
//!
//! Wires the control engine to the real transmitter and amplifier and
//! renders its event stream as plain console lines. All control logic lives
//! in trim-core; this binary only connects, displays, and shuts down.

use std::fs;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trim_core::{run_controller, AmpLink, Config, ControllerCommand, RadioLink, SessionEvent};

/// Optional JSON override for the built-in configuration constants.
const CONFIG_PATH: &str = "trim.json";

/// Load the session configuration, falling back to the defaults.
fn load_config() -> Config {
    match fs::read_to_string(CONFIG_PATH) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(config) => {
                info!("loaded configuration from {CONFIG_PATH}");
                config
            }
            Err(e) => {
                warn!("ignoring malformed {CONFIG_PATH}: {e}");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

/// Render the event stream until the controller drops its sender.
async fn run_display(mut event_rx: mpsc::Receiver<SessionEvent>) {
    while let Some(event) = event_rx.recv().await {
        match event {
            SessionEvent::Power { radio, amp } => {
                println!("Radio {} W | Amp {} W", watts(radio), watts(amp));
            }
            SessionEvent::Status { message } => {
                println!("* {message}");
            }
        }
    }
}

fn watts(value: Option<u32>) -> String {
    value.map_or_else(|| "---".to_string(), |w| w.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trim_console=info,trim_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config();
    info!(
        "starting txtrim governor (radio {}:{}, amp {}:{})",
        config.radio_host, config.radio_port, config.amp_host, config.amp_port
    );

    let (ctrl_tx, ctrl_rx) = mpsc::channel(256);
    let (event_tx, event_rx) = mpsc::channel(256);
    let (radio_cmd_tx, radio_cmd_rx) = mpsc::channel(64);

    let controller = tokio::spawn(run_controller(
        config.clone(),
        ctrl_rx,
        event_tx.clone(),
        radio_cmd_tx,
    ));
    let display = tokio::spawn(run_display(event_rx));

    // Each side connects independently; a failed side is reported and
    // skipped while the other keeps running.
    let mut stops = Vec::new();

    match RadioLink::connect(&config.radio_host, config.radio_port, ctrl_tx.clone()).await {
        Ok(link) => {
            let (stop_tx, stop_rx) = oneshot::channel();
            stops.push(stop_tx);
            tokio::spawn(link.run(stop_rx, radio_cmd_rx));
        }
        Err(e) => {
            let _ = event_tx
                .send(SessionEvent::Status {
                    message: e.to_string(),
                })
                .await;
        }
    }

    match AmpLink::connect(&config.amp_host, config.amp_port, ctrl_tx.clone()).await {
        Ok(link) => {
            let (stop_tx, stop_rx) = oneshot::channel();
            stops.push(stop_tx);
            tokio::spawn(link.run(stop_rx));
        }
        Err(e) => {
            let _ = event_tx
                .send(SessionEvent::Status {
                    message: e.to_string(),
                })
                .await;
        }
    }

    if stops.is_empty() {
        anyhow::bail!("neither peer is reachable, nothing to govern");
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutting down");

    for stop in stops {
        let _ = stop.send(());
    }
    let _ = ctrl_tx.send(ControllerCommand::Shutdown).await;
    controller.await.context("controller task panicked")?;

    drop(event_tx);
    display.await.context("display task panicked")?;

    Ok(())
}
