//! Periodic directory rescan (spec §4.5 "Master loop", step 1: "If the
//! scanner reports a changed batch ... assimilate it").
use std::sync::Arc;
use std::time::Duration;

use swarmcast_peer_protocol::Outbound;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::container::AppContainer;
use crate::events::Event;

#[must_use]
pub fn start_job(app_container: Arc<AppContainer>, cancellation_token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(app_container.core.rescan_interval_secs.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancellation_token.cancelled() => {
                    tracing::info!(target: "BATCH_SCAN", "shutting down");
                    break;
                }
                _ = interval.tick() => {
                    run_one_scan(&app_container).await;
                }
            }
        }
    })
}

async fn run_one_scan(app_container: &Arc<AppContainer>) {
    let root_dir = app_container.blob_store_config.root_dir.clone();
    let chunk_size_bytes = app_container.blob_store_config.chunk_size_bytes;

    let scanned = match tokio::task::spawn_blocking(move || swarmcast_blob_store::chunking::scan(&root_dir, chunk_size_bytes)).await {
        Ok(Ok(batch)) => batch,
        Ok(Err(err)) => {
            tracing::warn!(target: "BATCH_SCAN", %err, "directory scan failed, the previous batch remains authoritative");
            return;
        }
        Err(err) => {
            tracing::warn!(target: "BATCH_SCAN", %err, "directory scan task panicked, the previous batch remains authoritative");
            return;
        }
    };

    let changed = {
        let mut current = app_container.batch.lock().await;
        if *current == scanned {
            false
        } else {
            *current = scanned.clone();
            true
        }
    };

    if !changed {
        return;
    }

    let hashes = scanned.hashes();
    let hash_count = hashes.len();

    {
        let mut swarm = app_container.swarm.lock().await;
        swarm.reset_hashes(hashes);

        for node in swarm.nodes() {
            if let Some(client) = node.client() {
                let _ = client.outbound.try_send(Outbound::NewBatch { data: scanned.clone() });
            }
        }
    }

    app_container.replan.fire();
    app_container.metrics.record_batch_assimilated();

    if let Some(sender) = app_container.event_bus.sender() {
        let _ = sender.send(Event::BatchChanged { hash_count }).await;
    }

    tracing::info!(target: "BATCH_SCAN", hash_count, "assimilated a new batch");
}
