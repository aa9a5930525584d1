//! Wires together the swarm graph and the ambient stack (registar, metrics,
//! event bus) every job and server in this binary shares.
use std::collections::HashSet;
use std::sync::Arc;

use swarmcast_configuration::v1::blob_store::BlobStore as BlobStoreConfig;
use swarmcast_configuration::v1::core::Core;
use swarmcast_configuration::v1::health_check_api::HealthCheckApi as HealthCheckApiConfig;
use swarmcast_configuration::v1::peer_session::PeerSession as PeerSessionConfig;
use swarmcast_configuration::Configuration;
use swarmcast_primitives::Batch;
use swarmcast_server_lib::registar::Registar;
use swarmcast_swarm_core::{FullyConnected, ReplanTrigger, Swarm};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::events::bus::EventBus;
use crate::metrics::MasterMetrics;

/// Everything the master loop's jobs and the three axum servers need: the
/// single swarm mutation point, the current batch, the replan trigger, and
/// the ambient stack (`Registar`, `MasterMetrics`, the event bus) plus the
/// configuration slices each server binds from.
pub struct AppContainer {
    pub swarm: Arc<Mutex<Swarm>>,
    pub batch: Arc<Mutex<Batch>>,
    pub replan: Arc<ReplanTrigger>,

    pub registar: Registar,
    pub metrics: Arc<MasterMetrics>,
    pub event_bus: Arc<EventBus>,

    pub core: Core,
    pub peer_session_config: PeerSessionConfig,
    pub blob_store_config: BlobStoreConfig,
    pub health_check_api_config: HealthCheckApiConfig,
}

impl AppContainer {
    /// Builds the swarm with the master node already joined (spec §3
    /// "lifecycle": the master always exists, owns every hash once a batch
    /// is assimilated, and is never dispatched a `download` order — hence
    /// `max_concurrent_dls = 0`).
    #[instrument(skip(configuration))]
    #[must_use]
    pub fn initialize(configuration: &Configuration) -> AppContainer {
        let mut swarm = Swarm::new(Box::new(FullyConnected), configuration.core.avg_window_size);

        swarm
            .node_join(
                "master".to_string(),
                &HashSet::new(),
                0,
                configuration.core.upload_slots,
                true,
                None,
            )
            .expect("the swarm is freshly created, so no master node exists yet");

        AppContainer {
            swarm: Arc::new(Mutex::new(swarm)),
            batch: Arc::new(Mutex::new(Batch::default())),
            replan: Arc::new(ReplanTrigger::new()),

            registar: Registar::default(),
            metrics: Arc::new(MasterMetrics::new()),
            event_bus: Arc::new(EventBus::default()),

            core: configuration.core.clone(),
            peer_session_config: configuration.peer_session.clone(),
            blob_store_config: configuration.blob_store.clone(),
            health_check_api_config: configuration.health_check_api.clone(),
        }
    }
}
