//! C4 Transfer Planner (spec §4.3): a pure function over swarm state
//! producing the set of transfers to dispatch this tick.
use std::collections::{HashMap, HashSet};

use swarmcast_primitives::ChunkHash;
use swarmcast_swarm_core::{Node, NodeId, Swarm};

/// Knobs the planner needs beyond the swarm graph itself (spec §4.3 step 6,
/// sourced from `swarmcast-configuration`'s `Core`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Timeout used when a sender has no recorded `avg_ul_time` yet.
    pub default_transfer_timeout_secs: u64,

    /// Multiplier `k` applied to a sender's `avg_ul_time`.
    pub transfer_timeout_multiplier: u64,

    /// Floor applied to the derived timeout.
    pub min_transfer_timeout_secs: u64,

    /// A sender's total upload bandwidth budget in bytes/sec, divided by
    /// its `max_concurrent_uls`. `0.0` means uncapped.
    pub upload_bandwidth_bytes_per_sec: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_transfer_timeout_secs: 60,
            transfer_timeout_multiplier: 5,
            min_transfer_timeout_secs: 10,
            upload_bandwidth_bytes_per_sec: 0.0,
        }
    }
}

/// One scheduled chunk transfer, emitted by [`plan_transfers`] and
/// dispatched as a `download` order to `to`'s outbound queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub hash: ChunkHash,
    pub from: NodeId,
    pub to: NodeId,
    pub timeout_secs: u64,
    pub max_bandwidth: f64,
}

/// A sender's "neutral" `avg_ul_time` when none has been recorded yet: the
/// same constant used elsewhere as the no-data timeout fallback, so an
/// untested sender is assumed to perform like an average one rather than
/// being favoured or penalised (spec §4.3 step 5, "unknown = neutral";
/// see DESIGN.md Open Question decisions).
fn neutral_avg_ul_time(node: &Node, config: &PlannerConfig) -> f64 {
    node.avg_ul_time().unwrap_or(config.default_transfer_timeout_secs as f64)
}

fn transfer_timeout_secs(sender: &Node, config: &PlannerConfig) -> u64 {
    match sender.avg_ul_time() {
        None => config.default_transfer_timeout_secs,
        Some(avg) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let derived = (avg * config.transfer_timeout_multiplier as f64).round() as u64;
            derived.max(config.min_transfer_timeout_secs)
        }
    }
}

fn max_bandwidth(sender: &Node, config: &PlannerConfig) -> f64 {
    if config.upload_bandwidth_bytes_per_sec <= 0.0 || sender.max_concurrent_uls() == 0 {
        return 0.0;
    }

    config.upload_bandwidth_bytes_per_sec / sender.max_concurrent_uls() as f64
}

/// Runs one planning pass (spec §4.3). Pure: calling this twice on an
/// unchanged `swarm` yields an identical sequence of transfers (spec §8
/// property 7).
#[must_use]
pub fn plan_transfers(swarm: &Swarm, config: &PlannerConfig) -> Vec<Transfer> {
    let rarity = swarm.rarity();
    let all_hashes = swarm.all_hashes();

    if all_hashes.is_empty() {
        return Vec::new();
    }

    // Stable sort by ascending rarity; ties keep `all_hashes`' own order.
    let mut hash_order: Vec<&ChunkHash> = all_hashes.iter().collect();
    hash_order.sort_by_key(|hash| rarity.get(*hash).copied().unwrap_or(0));

    let alive_ids: HashSet<NodeId> = swarm.alive_node_ids();

    let mut free_dl: HashMap<NodeId, usize> = alive_ids.iter().map(|id| (*id, swarm.node(*id).unwrap().free_dl())).collect();
    let mut free_ul: HashMap<NodeId, usize> = alive_ids.iter().map(|id| (*id, swarm.node(*id).unwrap().free_ul())).collect();

    let mut transfers = Vec::new();

    for hash in hash_order {
        if rarity.get(hash).copied().unwrap_or(0) == 0 {
            continue; // rarity 0: unavailable, cannot be scheduled this pass.
        }

        let mut receivers: Vec<&Node> = swarm
            .nodes()
            .filter(|n| {
                n.is_alive()
                    && !n.is_master()
                    && free_dl.get(&n.id()).copied().unwrap_or(0) > 0
                    && !n.hashes().contains(hash)
                    && !n.is_downloading(hash)
            })
            .collect();

        // Peers with less data served first.
        receivers.sort_by_key(|n| (n.hashes().len(), n.id()));

        for receiver in receivers {
            if free_dl.get(&receiver.id()).copied().unwrap_or(0) == 0 {
                continue;
            }

            let mut senders: Vec<&Node> = swarm
                .nodes()
                .filter(|s| {
                    s.is_alive()
                        && s.hashes().contains(hash)
                        && !s.is_downloading(hash)
                        && free_ul.get(&s.id()).copied().unwrap_or(0) > 0
                        && swarm.link_mapper().allows(s.id(), receiver.id())
                        && !receiver.active_downloads().contains_key(&(hash.clone(), s.id()))
                })
                .collect();

            senders.sort_by(|a, b| {
                neutral_avg_ul_time(a, config)
                    .partial_cmp(&neutral_avg_ul_time(b, config))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.active_uploads_count().cmp(&b.active_uploads_count()))
                    .then_with(|| a.name().cmp(b.name()))
            });

            let Some(sender) = senders.into_iter().next() else {
                continue;
            };

            *free_ul.get_mut(&sender.id()).expect("sender tracked in free_ul") -= 1;
            *free_dl.get_mut(&receiver.id()).expect("receiver tracked in free_dl") -= 1;

            transfers.push(Transfer {
                hash: hash.clone(),
                from: sender.id(),
                to: receiver.id(),
                timeout_secs: transfer_timeout_secs(sender, config),
                max_bandwidth: max_bandwidth(sender, config),
            });
        }
    }

    transfers
}
