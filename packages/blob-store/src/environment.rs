//! A running instance of the blob-store file server.
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use swarmcast_axum_server::signals::Halted;
use swarmcast_configuration::v1::blob_store::BlobStore as BlobStoreConfig;
use swarmcast_primitives::Batch;
use swarmcast_server_lib::registar::{Registar, ServiceHealthCheckJob};
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::server::router;
use crate::state::AppState;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub root_dir: String,
}

impl From<BlobStoreConfig> for Config {
    fn from(config: BlobStoreConfig) -> Self {
        Self {
            bind_address: config.bind_address,
            root_dir: config.root_dir,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to bind blob-store server to {bind_address}: {source}")]
    Bind { bind_address: SocketAddr, source: std::io::Error },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Running {
    pub binding: SocketAddr,
}

pub struct Started {
    pub state: Running,
    pub app_state: AppState,
    halt_tx: Option<oneshot::Sender<Halted>>,
    server_handle: JoinHandle<()>,
}

impl Started {
    /// Binds and starts the blob-store server, registering it with
    /// `registar` so the health-check API can probe it.
    ///
    /// # Panics
    ///
    /// Panics if `config.bind_address` cannot be bound.
    pub async fn new(config: &Config, batch: Arc<Mutex<Batch>>, registar: Registar) -> Self {
        let listener = TcpListener::bind(config.bind_address)
            .unwrap_or_else(|source| panic!("{}", Error::Bind { bind_address: config.bind_address, source }));

        let binding = listener.local_addr().expect("listener should be bound");

        let app_state = AppState::new(config.root_dir.clone(), batch);

        registar.give_form().submit(ServiceHealthCheckJob {
            binding,
            info: format!("checking blob-store server health check at: http://{binding}/"),
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

    /// Stops the blob-store server and waits for it to shut down.
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
