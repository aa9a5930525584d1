//! The planner tick: runs on the replan trigger, or on a periodic
//! safety-net timeout, whichever comes first (spec §4.5 "Master loop",
//! step 2: "Run the planner ... Dispatch each resulting transfer").
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use swarmcast_blob_store::stats::Stats as BlobStoreStats;
use swarmcast_peer_protocol::Outbound;
use swarmcast_swarm_core::{NodeId, Swarm};
use swarmcast_transfer_planner::{plan_transfers, PlannerConfig, Transfer};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::container::AppContainer;
use crate::events::Event;

#[must_use]
pub fn start_job(app_container: Arc<AppContainer>, blob_stats: Arc<BlobStoreStats>, cancellation_token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let tick_interval = Duration::from_secs(app_container.core.planner_tick_interval_secs.max(1));
        let mut known_alive: HashSet<NodeId> = HashSet::new();

        loop {
            tokio::select! {
                () = cancellation_token.cancelled() => {
                    tracing::info!(target: "PLANNER_TICK", "shutting down");
                    break;
                }
                // `wait` itself already races the periodic safety-net timeout
                // against an explicit fire (see `ReplanTrigger::wait`), so
                // this single branch implements both triggers.
                () = app_container.replan.wait(tick_interval) => {
                    run_one_tick(&app_container, &blob_stats, &mut known_alive).await;
                }
            }
        }
    })
}

async fn run_one_tick(app_container: &Arc<AppContainer>, blob_stats: &Arc<BlobStoreStats>, known_alive: &mut HashSet<NodeId>) {
    let durations = blob_stats.take_upload_durations().await;
    let active_uploads = blob_stats.active_uploads();

    let (joined, destroyed, transfers) = {
        let mut swarm = app_container.swarm.lock().await;

        fold_blob_store_stats(&mut swarm, &durations, active_uploads);

        let (joined, destroyed) = diff_membership(&swarm, known_alive);

        let config = PlannerConfig {
            default_transfer_timeout_secs: app_container.core.default_transfer_timeout_secs,
            transfer_timeout_multiplier: app_container.core.transfer_timeout_multiplier,
            min_transfer_timeout_secs: app_container.core.min_transfer_timeout_secs,
            upload_bandwidth_bytes_per_sec: app_container.core.upload_bandwidth_bytes_per_sec,
        };

        let transfers = plan_transfers(&swarm, &config);

        (joined, destroyed, transfers)
    };

    report_membership_changes(app_container, joined, destroyed).await;

    if !transfers.is_empty() {
        dispatch(app_container, &transfers).await;
    }
}

/// Folds the blob store's own upload counters into the master's node
/// bookkeeping (spec §4.5 flow step 2, DESIGN.md "master loop reads and
/// clears these on every planner tick"): the master is the one node this
/// master loop both coordinates and directly observes uploads for, since
/// its own blob store serves whatever it possesses.
fn fold_blob_store_stats(swarm: &mut Swarm, durations: &[f64], active_uploads: u64) {
    let Some(master_id) = swarm.master_id() else { return };
    let alive = swarm.alive_node_ids();

    let Some(master) = swarm.node_mut(master_id) else { return };

    if !durations.is_empty() {
        master.update_transfer_speed(durations);
    }

    #[allow(clippy::cast_possible_truncation)]
    let _ignored = master.set_active_transfers(HashMap::new(), active_uploads as usize, &alive);
}

/// Diffs the alive-node set against the previous tick's, so node
/// join/destroy can be turned into metrics and events without every
/// session handler having to know about either (spec.md's peer-session
/// state machine has no notion of the ambient stack; only the master loop
/// does).
fn diff_membership(swarm: &Swarm, known_alive: &mut HashSet<NodeId>) -> (Vec<(NodeId, String)>, Vec<NodeId>) {
    let current: HashSet<NodeId> = swarm.alive_node_ids();

    let joined: Vec<(NodeId, String)> = current
        .difference(known_alive)
        .filter_map(|id| swarm.node(*id).map(|node| (*id, node.name().to_string())))
        .collect();

    let destroyed: Vec<NodeId> = known_alive.difference(&current).copied().collect();

    *known_alive = current;

    (joined, destroyed)
}

async fn report_membership_changes(app_container: &Arc<AppContainer>, joined: Vec<(NodeId, String)>, destroyed: Vec<NodeId>) {
    for (id, name) in joined {
        app_container.metrics.record_node_joined();
        if let Some(sender) = app_container.event_bus.sender() {
            let _ = sender.send(Event::NodeJoined { id, name }).await;
        }
    }

    for id in destroyed {
        app_container.metrics.record_node_destroyed();
        if let Some(sender) = app_container.event_bus.sender() {
            let _ = sender.send(Event::NodeDestroyed { id }).await;
        }
    }
}

/// Dispatches each planned transfer as a `download` order onto the
/// receiver's outbound queue, addressed at the sender's advertised
/// download URL (spec §4.3 step 7 "emission").
async fn dispatch(app_container: &Arc<AppContainer>, transfers: &[Transfer]) {
    let mut scheduled = 0usize;

    {
        let swarm = app_container.swarm.lock().await;

        for transfer in transfers {
            let Some(sender_client) = swarm.node(transfer.from).and_then(swarmcast_swarm_core::Node::client) else {
                continue;
            };
            let Some(receiver_client) = swarm.node(transfer.to).and_then(swarmcast_swarm_core::Node::client) else {
                continue;
            };

            let url = sender_client.dl_url_template.replace("{hash}", transfer.hash.as_str());

            let frame = Outbound::Download {
                hash: transfer.hash.clone(),
                url,
                timeout: transfer.timeout_secs,
                max_rate: transfer.max_bandwidth,
            };

            if receiver_client.outbound.try_send(frame).is_ok() {
                scheduled += 1;
            }
        }
    }

    if scheduled == 0 {
        return;
    }

    #[allow(clippy::cast_possible_truncation)]
    app_container.metrics.record_transfers_scheduled(scheduled as u64);

    if let Some(sender) = app_container.event_bus.sender() {
        let _ = sender.send(Event::TransfersScheduled { count: scheduled }).await;
    }
}
