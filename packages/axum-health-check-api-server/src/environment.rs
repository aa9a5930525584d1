//! A running instance of the health-check API, used both by the swarmcast
//! master binary and by this crate's own integration tests.
use std::net::{SocketAddr, TcpListener};

use swarmcast_axum_server::signals::Halted;
use swarmcast_configuration::v1::health_check_api::HealthCheckApi;
use swarmcast_server_lib::registar::Registar;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::server::router;

/// The subset of configuration the health-check API needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bind_address: SocketAddr,
}

impl From<HealthCheckApi> for Config {
    fn from(config: HealthCheckApi) -> Self {
        Self {
            bind_address: config.bind_address,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to bind health-check API to {bind_address}: {source}")]
    Bind {
        bind_address: SocketAddr,
        source: std::io::Error,
    },
}

/// The address a running health-check API is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Running {
    pub binding: SocketAddr,
}

/// A started health-check API, along with the handle needed to stop it.
pub struct Started {
    pub state: Running,
    halt_tx: Option<oneshot::Sender<Halted>>,
    server_handle: JoinHandle<()>,
}

impl Started {
    /// Binds and starts the health-check API.
    ///
    /// # Panics
    ///
    /// Panics if `config.bind_address` cannot be bound.
    pub async fn new(config: &Config, registar: Registar) -> Self {
        let listener = TcpListener::bind(config.bind_address)
            .unwrap_or_else(|source| panic!("{}", Error::Bind { bind_address: config.bind_address, source }));

        let binding = listener.local_addr().expect("listener should be bound");

        let (tx_halt, rx_halt) = oneshot::channel();
        let server_handle = swarmcast_axum_server::start(listener, router(registar), rx_halt);

        Self {
            state: Running { binding },
            halt_tx: Some(tx_halt),
            server_handle,
        }
    }

    /// Stops the health-check API and waits for it to shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the server task panicked.
    pub async fn stop(mut self) -> Result<(), tokio::task::JoinError> {
        if let Some(halt_tx) = self.halt_tx.take() {
            let _ = halt_tx.send(Halted("test finished".to_string()));
        }

        self.server_handle.await
    }
}
