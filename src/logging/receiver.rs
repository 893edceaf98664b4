//! Host event feed
//!
//! Receives [`HostEvent`] messages as newline-delimited JSON over a localhost UDP
//! socket and forwards them, in arrival order, to the console event loop.

use super::{ProducerMessage, SourceId};
use crate::constants::{CHANNEL_CAPACITY, FEED_READ_TIMEOUT_MS, UDP_BUFFER_SIZE};
use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Everything the host can tell the console
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Output from a producer
    Message(ProducerMessage),
    /// The host's current document changed
    ActiveSource { source: Option<SourceId> },
    /// The log viewer for the active source gained focus
    ViewerOpened,
    /// The log viewer lost focus or was closed
    ViewerClosed,
}

/// Spawn the UDP feed receiver on `port`
///
/// The socket is bound up-front so callers can handle port-in-use cleanly.
/// The receiver thread exits when `shutdown` is set or the channel closes.
pub fn spawn_feed_receiver(
    shutdown: Arc<AtomicBool>,
    port: u16,
) -> Result<mpsc::Receiver<HostEvent>> {
    let (tx, rx) = mpsc::channel::<HostEvent>(CHANNEL_CAPACITY);

    let socket = UdpSocket::bind(format!("127.0.0.1:{port}"))
        .map_err(|source| ConsoleError::FeedBind { port, source })?;
    socket
        .set_read_timeout(Some(Duration::from_millis(FEED_READ_TIMEOUT_MS)))
        .ok();

    debug!(port, "feed receiver listening");
    std::thread::spawn(move || {
        run_receiver(socket, tx, shutdown);
    });

    Ok(rx)
}

/// Parse every event in one datagram. Malformed lines are skipped.
pub fn parse_datagram(text: &str) -> Vec<HostEvent> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => Some(event),
            Err(e) => {
                trace!("dropping malformed feed line: {}", e);
                None
            }
        })
        .collect()
}

/// Run the receiver loop (blocking, runs in thread)
fn run_receiver(socket: UdpSocket, tx: mpsc::Sender<HostEvent>, shutdown: Arc<AtomicBool>) {
    let mut buf = vec![0u8; UDP_BUFFER_SIZE];

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match socket.recv_from(&mut buf) {
            Ok((len, _addr)) => {
                let Ok(text) = std::str::from_utf8(&buf[..len]) else {
                    trace!("dropping non-UTF-8 datagram ({} bytes)", len);
                    continue;
                };
                for event in parse_datagram(text) {
                    // Entries must not be lost, so wait for room instead of dropping
                    if tx.blocking_send(event).is_err() {
                        return;
                    }
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                // Timeout - check shutdown and continue
                continue;
            }
            Err(e) => {
                debug!("feed socket error: {}", e);
                break;
            }
        }
    }
    debug!("feed receiver stopped");
}
