//! A running instance of the peer-session server, used both by the
//! swarmcast master binary and by this crate's own integration tests.
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use swarmcast_axum_server::signals::Halted;
use swarmcast_configuration::v1::core::Core;
use swarmcast_configuration::v1::peer_session::PeerSession as PeerSessionConfig;
use swarmcast_primitives::Batch;
use swarmcast_server_lib::registar::{Registar, ServiceHealthCheckJob};
use swarmcast_swarm_core::{ReplanTrigger, Swarm};
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::router::router;
use crate::state::AppState;

/// The subset of configuration the peer-session server needs.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub core: Core,
}

impl Config {
    #[must_use]
    pub fn new(peer_session: &PeerSessionConfig, core: &Core) -> Self {
        Self {
            bind_address: peer_session.bind_address,
            core: core.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to bind peer-session server to {bind_address}: {source}")]
    Bind { bind_address: SocketAddr, source: std::io::Error },
}

/// The address a running peer-session server is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Running {
    pub binding: SocketAddr,
}

/// A started peer-session server, along with the handles needed to stop it
/// and reach the swarm it coordinates.
pub struct Started {
    pub state: Running,
    pub app_state: AppState,
    halt_tx: Option<oneshot::Sender<Halted>>,
    server_handle: JoinHandle<()>,
}

impl Started {
    /// Binds and starts the peer-session server, registering it with
    /// `registar` so the health-check API can probe it.
    ///
    /// # Panics
    ///
    /// Panics if `config.bind_address` cannot be bound.
    pub async fn new(config: &Config, swarm: Arc<Mutex<Swarm>>, batch: Arc<Mutex<Batch>>, replan: Arc<ReplanTrigger>, registar: Registar) -> Self {
        let listener = TcpListener::bind(config.bind_address)
            .unwrap_or_else(|source| panic!("{}", Error::Bind { bind_address: config.bind_address, source }));

        let binding = listener.local_addr().expect("listener should be bound");

        let app_state = AppState::new(swarm, batch, replan, config.core.clone());

        registar.give_form().submit(ServiceHealthCheckJob {
            binding,
            info: format!("checking peer-session server health check at: http://{binding}/"),
            health_check_url: format!("http://{binding}/"),
        });

        let (tx_halt, rx_halt) = oneshot::channel();
        let server_handle = swarmcast_axum_server::start(listener, router(app_state.clone()), rx_halt);

        Self {
            state: Running { binding },
            app_state,
            halt_tx: Some(tx_halt),
            server_handle,
        }
    }

    /// Stops the peer-session server and waits for it to shut down.
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
