//! Connectivity monitor - periodic TCP probe of the API host

use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::messages::NetworkResponse;

/// Probe `host:port` once; any failure counts as offline
pub async fn probe(host: &str, port: u16, limit: Duration) -> bool {
    matches!(timeout(limit, TcpStream::connect((host, port))).await, Ok(Ok(_)))
}

/// Run until cancelled, reporting `Connectivity` only when the state flips.
/// The first probe result is always reported if it is offline.
pub async fn run_monitor(
    host: String,
    port: u16,
    every: Duration,
    limit: Duration,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_online = true;

    loop {
        tokio::select! {
            biased;

            _ = &mut cancel_rx => return,

            _ = ticker.tick() => {
                let online = probe(&host, port, limit).await;
                if online != last_online {
                    tracing::info!(host = %host, online, "connectivity changed");
                    last_online = online;
                    if response_tx.send(NetworkResponse::Connectivity { online }).is_err() {
                        return;
                    }
                }
            }
        }
    }
}
