//! Graceful-shutdown signalling shared by every server: either an OS
//! `ctrl-c` or an explicit halt sent on a oneshot channel, whichever comes
//! first.
use tokio::sync::oneshot;
use tracing::instrument;

/// Sent on a server's halt channel to request a graceful shutdown, carrying
/// the reason for the log line.
#[derive(Debug)]
pub struct Halted(pub String);

/// Waits for either `ctrl-c` or `rx_halt` to fire, logging `message` either
/// way. Used as the future passed to `axum_server::Handle::shutdown_signal`-
/// style callers before they start winding down connections.
#[instrument(skip(rx_halt))]
pub async fn shutdown_signal_with_message(rx_halt: oneshot::Receiver<Halted>, message: String) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("{message}: shutdown requested via ctrl-c");
        }
        halted = rx_halt => {
            match halted {
                Ok(Halted(reason)) => tracing::info!("{message}: shutdown requested, reason: {reason}"),
                Err(_) => tracing::warn!("{message}: halt channel closed without a signal"),
            }
        }
    }
}
