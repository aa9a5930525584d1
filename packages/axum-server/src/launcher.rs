//! Starts an Axum router on an already-bound `TcpListener`, racing it
//! against [`crate::signals::graceful_shutdown`] so every server in the
//! workspace shuts down the same way.
use std::net::{SocketAddr, TcpListener};

use axum::Router;
use swarmcast_server_lib::signals::Halted;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::signals::graceful_shutdown;

/// Spawns `router` on `listener`, returning a handle that resolves once the
/// server has fully stopped (either because `rx_halt` fired or the process
/// received `ctrl-c`).
///
/// # Panics
///
/// Panics if `listener`'s local address cannot be read or it cannot be put
/// into non-blocking mode; both are programmer errors (the listener must be
/// a freshly bound `std::net::TcpListener`).
#[must_use]
pub fn start(listener: TcpListener, router: Router, rx_halt: oneshot::Receiver<Halted>) -> JoinHandle<()> {
    let address: SocketAddr = listener.local_addr().expect("listener should be bound to a local address");

    listener
        .set_nonblocking(true)
        .expect("listener should support non-blocking mode");

    let handle = axum_server::Handle::new();

    tokio::spawn(graceful_shutdown(
        handle.clone(),
        rx_halt,
        format!("server on {address}"),
        address,
    ));

    tokio::spawn(async move {
        if let Err(err) = axum_server::from_tcp(listener)
            .handle(handle)
            .serve(router.into_make_service())
            .await
        {
            tracing::error!("server on {address} stopped with error: {err}");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
    use std::time::Duration;

    use axum::routing::get;
    use axum::Router;
    use tokio::sync::oneshot;

    use super::start;
    use crate::signals::graceful_shutdown;
    use swarmcast_server_lib::signals::Halted;

    #[tokio::test]
    async fn it_should_serve_requests_until_halted() {
        let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)).expect("should bind");
        let address = listener.local_addr().expect("should have a local address");

        let router = Router::new().route("/ping", get(|| async { "pong" }));

        let (tx_halt, rx_halt) = oneshot::channel();
        let join_handle = start(listener, router, rx_halt);

        tokio::time::sleep(Duration::from_millis(50)).await;

        let response = reqwest::get(format!("http://{address}/ping"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), 200);

        tx_halt.send(Halted("test finished".to_string())).expect("should still be listening");

        tokio::time::timeout(Duration::from_secs(1), join_handle)
            .await
            .expect("server should shut down promptly")
            .expect("server task should not panic");
    }

    #[tokio::test]
    async fn graceful_shutdown_should_resolve_once_halted() {
        let handle = axum_server::Handle::new();
        let (tx, rx) = oneshot::channel();

        tx.send(Halted("bye".to_string())).expect("receiver should be open");

        tokio::time::timeout(
            Duration::from_secs(1),
            graceful_shutdown(handle, rx, "test".to_string(), SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)),
        )
        .await
        .expect("graceful shutdown should resolve promptly");
    }
}
