//! Shared state handed to every axum handler in this crate.
use std::sync::Arc;
use std::time::Duration;

use swarmcast_configuration::v1::core::Core;
use swarmcast_primitives::Batch;
use swarmcast_swarm_core::{ReplanTrigger, Swarm};
use tokio::sync::Mutex;

use crate::status::StatusCache;

/// Everything a connection handler needs: the single swarm mutation point,
/// the current batch (for `initial_batch`/`new_batch`), the replan trigger,
/// and the slice of `Core` configuration relevant to sessions.
#[derive(Clone)]
pub struct AppState {
    pub swarm: Arc<Mutex<Swarm>>,
    pub batch: Arc<Mutex<Batch>>,
    pub replan: Arc<ReplanTrigger>,
    pub core: Core,
    pub status_cache: Arc<Mutex<StatusCache>>,
}

impl AppState {
    #[must_use]
    pub fn new(swarm: Arc<Mutex<Swarm>>, batch: Arc<Mutex<Batch>>, replan: Arc<ReplanTrigger>, core: Core) -> Self {
        let status_cache_ttl = Duration::from_secs(3);
        Self {
            swarm,
            batch,
            replan,
            core,
            status_cache: Arc::new(Mutex::new(StatusCache::new(status_cache_ttl))),
        }
    }

    /// Pushes a fresh `new_batch` frame to every joined peer, e.g. after the
    /// (out-of-scope) scanner produces a new batch. Sessions whose outbound
    /// queue is full are skipped rather than blocked on.
    pub async fn broadcast_new_batch(&self) {
        let batch = self.batch.lock().await.clone();
        let swarm = self.swarm.lock().await;

        for node in swarm.nodes() {
            if let Some(client) = node.client() {
                let _ = client.outbound.try_send(swarmcast_peer_protocol::Outbound::NewBatch { data: batch.clone() });
            }
        }
    }
}
