//! Async line-oriented link tasks
//!
//! Both peers speak newline-delimited ASCII over TCP. Each link runs in its
//! own spawned task: inbound bytes are decoded into lines and fed to the
//! controller, and (for the transmitter) outbound command text is framed
//! with a session-scoped sequence number and written from the same task, so
//! the controller hands a command off and never waits on a network flush.
//! Write failures come back asynchronously as a [`ControllerCommand::LinkDown`].
//!
//! Generic over the I/O type so tests can drive a link with
//! `tokio::io::duplex()` instead of a real socket.
//!
//! A link that loses its connection reports once and exits; the other link
//! keeps running. Reconnection is deliberately not attempted.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use trim_proto::{frame_command, SUBSCRIBE_TX_STATUS};

use crate::controller::ControllerCommand;
use crate::error::LinkError;

/// Open a TCP connection to one of the peers.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream, LinkError> {
    TcpStream::connect((host, port))
        .await
        .map_err(|source| LinkError::Connect {
            host: host.to_string(),
            port,
            source,
        })
}

/// Link to the transmitter: status receive loop plus sequence-framed writes
///
/// The sequence counter lives here, with the only writer, so numbers are
/// strictly increasing from 1 with no gaps and no reuse within a session.
pub struct RadioLink<T> {
    io: T,
    ctrl_tx: mpsc::Sender<ControllerCommand>,
    seq: u64,
}

impl RadioLink<TcpStream> {
    /// Connect to the transmitter and build its link.
    pub async fn connect(
        host: &str,
        port: u16,
        ctrl_tx: mpsc::Sender<ControllerCommand>,
    ) -> Result<Self, LinkError> {
        Ok(Self::new(connect(host, port).await?, ctrl_tx))
    }
}

impl<T> RadioLink<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Build a link over an existing connection (or a duplex pipe in tests).
    pub fn new(io: T, ctrl_tx: mpsc::Sender<ControllerCommand>) -> Self {
        Self {
            io,
            ctrl_tx,
            seq: 0,
        }
    }

    /// Run the link until shutdown, peer close, or I/O failure.
    ///
    /// The status subscription goes out first and takes the session's first
    /// sequence number. After that one loop services inbound lines and
    /// outbound command text; closing `cmd_rx` behaves like shutdown.
    pub async fn run(
        self,
        mut shutdown_rx: oneshot::Receiver<()>,
        mut cmd_rx: mpsc::Receiver<String>,
    ) {
        info!("radio link starting");

        let Self {
            io,
            ctrl_tx,
            mut seq,
        } = self;
        let (reader, mut writer) = tokio::io::split(io);
        let mut lines = BufReader::new(reader).lines();

        let mut failure = send_framed(&mut writer, &mut seq, SUBSCRIBE_TX_STATUS)
            .await
            .err();

        while failure.is_none() {
            tokio::select! {
                _ = &mut shutdown_rx => break,

                cmd = cmd_rx.recv() => {
                    let Some(text) = cmd else { break };
                    failure = send_framed(&mut writer, &mut seq, &text).await.err();
                }

                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        debug!("radio <- {line}");
                        if ctrl_tx.send(ControllerCommand::RadioLine(line)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        failure = Some(LinkError::Closed);
                    }
                    Err(e) => {
                        failure = Some(LinkError::Io(e));
                    }
                },
            }
        }

        if let Some(err) = failure {
            warn!("radio link failed: {err}");
            let _ = ctrl_tx
                .send(ControllerCommand::LinkDown {
                    source: "radio",
                    message: err.to_string(),
                })
                .await;
        }

        info!("radio link stopped");
    }
}

/// Frame a command with the next sequence number and write it out.
async fn send_framed<W>(writer: &mut W, seq: &mut u64, command: &str) -> Result<(), LinkError>
where
    W: AsyncWrite + Unpin,
{
    *seq += 1;
    let framed = frame_command(*seq, command);
    debug!("radio -> {}", framed.trim_end());
    writer.write_all(framed.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Link to the amplifier: receive-only meter stream
pub struct AmpLink<T> {
    io: T,
    ctrl_tx: mpsc::Sender<ControllerCommand>,
}

impl AmpLink<TcpStream> {
    /// Connect to the amplifier and build its link.
    pub async fn connect(
        host: &str,
        port: u16,
        ctrl_tx: mpsc::Sender<ControllerCommand>,
    ) -> Result<Self, LinkError> {
        Ok(Self::new(connect(host, port).await?, ctrl_tx))
    }
}

impl<T> AmpLink<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Build a link over an existing connection (or a duplex pipe in tests).
    pub fn new(io: T, ctrl_tx: mpsc::Sender<ControllerCommand>) -> Self {
        Self { io, ctrl_tx }
    }

    /// Run the receive loop until shutdown, peer close, or I/O failure.
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) {
        info!("amp link starting");

        let Self { io, ctrl_tx } = self;
        let mut lines = BufReader::new(io).lines();
        let mut failure = None;

        while failure.is_none() {
            tokio::select! {
                _ = &mut shutdown_rx => break,

                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        debug!("amp <- {line}");
                        if ctrl_tx.send(ControllerCommand::AmpLine(line)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        failure = Some(LinkError::Closed);
                    }
                    Err(e) => {
                        failure = Some(LinkError::Io(e));
                    }
                },
            }
        }

        if let Some(err) = failure {
            warn!("amp link failed: {err}");
            let _ = ctrl_tx
                .send(ControllerCommand::LinkDown {
                    source: "amp",
                    message: err.to_string(),
                })
                .await;
        }

        info!("amp link stopped");
    }
}
