//! C3 Swarm Coordinator: owns the set of nodes and the authoritative hash
//! universe (spec §4.2).
use std::collections::{HashMap, HashSet};

use swarmcast_primitives::ChunkHash;

use crate::link::{FullyConnected, LinkMapper};
use crate::node::{Client, Node, NodeId};

/// A rendering-friendly snapshot of the swarm, for `GET /` status pages.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTable {
    pub all_hashes: Vec<ChunkHash>,
    pub nodes: Vec<NodeStatusRow>,
}

/// One node's row in [`StatusTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStatusRow {
    pub name: String,
    /// One entry per hash in `all_hashes`, in the same order: `1.0` = have,
    /// `0.5` = downloading, `0.0` = missing.
    pub possession: Vec<f64>,
    pub dls: usize,
    pub uls: usize,
    /// `None` renders as `-1` on the wire (spec §4.1 `avg_ul_time`).
    pub avg_ul_time: Option<f64>,
}

/// Errors raised by [`Swarm`] operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SwarmError {
    #[error("the swarm already has a master node")]
    AlreadyHasMaster,

    #[error("no such node {0}")]
    NoSuchNode(NodeId),
}

/// Owns every [`Node`] plus the authoritative hash universe. The sole
/// mutator of swarm state; spec §5 assumes this runs on one logical actor
/// (the master loop), so no internal locking is needed here — callers wrap
/// a whole `Swarm` in one `Mutex` if they need to share it across tasks.
#[derive(Debug)]
pub struct Swarm {
    nodes: std::collections::BTreeMap<NodeId, Node>,
    all_hashes: Vec<ChunkHash>,
    link_mapper: Box<dyn LinkMapper>,
    master_id: Option<NodeId>,
    next_id: u64,
    avg_window_size: usize,
}

impl Default for Swarm {
    fn default() -> Self {
        Self::new(Box::new(FullyConnected), 20)
    }
}

impl Swarm {
    #[must_use]
    pub fn new(link_mapper: Box<dyn LinkMapper>, avg_window_size: usize) -> Self {
        Self {
            nodes: std::collections::BTreeMap::new(),
            all_hashes: Vec::new(),
            link_mapper,
            master_id: None,
            next_id: 0,
            avg_window_size,
        }
    }

    #[must_use]
    pub fn all_hashes(&self) -> &[ChunkHash] {
        &self.all_hashes
    }

    #[must_use]
    pub fn link_mapper(&self) -> &dyn LinkMapper {
        self.link_mapper.as_ref()
    }

    #[must_use]
    pub fn master_id(&self) -> Option<NodeId> {
        self.master_id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    #[must_use]
    pub fn alive_node_ids(&self) -> HashSet<NodeId> {
        self.nodes.values().filter(|n| n.is_alive()).map(Node::id).collect()
    }

    /// Allocates a new [`Node`], filters `initial_hashes` against the
    /// current universe, and admits it.
    ///
    /// Returns the new node's id together with any of `initial_hashes`
    /// that fall outside the universe (spec §3 invariant 1).
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::AlreadyHasMaster`] if `is_master` is set and a
    /// master node already exists (spec §3 invariant 4).
    pub fn node_join(
        &mut self,
        name: String,
        initial_hashes: &HashSet<ChunkHash>,
        max_concurrent_dls: usize,
        max_concurrent_uls: usize,
        is_master: bool,
        client: Option<Client>,
    ) -> Result<(NodeId, HashSet<ChunkHash>), SwarmError> {
        if is_master && self.master_id.is_some() {
            return Err(SwarmError::AlreadyHasMaster);
        }

        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        let mut node = Node::new(id, name, is_master, max_concurrent_dls, max_concurrent_uls, self.avg_window_size, client);

        let universe: HashSet<ChunkHash> = self.all_hashes.iter().cloned().collect();
        let unknown = node.add_hashes(initial_hashes, true, &universe);

        self.nodes.insert(id, node);

        if is_master {
            self.master_id = Some(id);
        }

        Ok((id, unknown))
    }

    /// Removes a node from the swarm. Idempotent: the second call on an
    /// already-removed id is a no-op (spec §3 "Lifecycle", §8 property 5).
    pub fn destroy_node(&mut self, id: NodeId) {
        if let Some(mut node) = self.nodes.remove(&id) {
            node.destroy();
        }

        if self.master_id == Some(id) {
            self.master_id = None;
        }
    }

    /// Replaces the authoritative hash universe. Every node's claimed
    /// possession set is intersected with the new universe; the master's
    /// is set to the new universe exactly (spec §3 invariant 2).
    pub fn reset_hashes(&mut self, new_universe: Vec<ChunkHash>) {
        let universe_set: HashSet<ChunkHash> = new_universe.iter().cloned().collect();

        for node in self.nodes.values_mut() {
            if node.is_master() {
                let _unknown = node.add_hashes(&universe_set, true, &universe_set);
            } else {
                let owned = node.hashes().clone();
                let _unknown = node.add_hashes(&owned, true, &universe_set);
            }
        }

        self.all_hashes = new_universe;
    }

    /// A rendering-friendly snapshot for `GET /` (spec §4.2).
    #[must_use]
    pub fn get_status_table(&self) -> StatusTable {
        let nodes = self
            .nodes
            .values()
            .filter(|n| n.is_alive())
            .map(|node| {
                let possession = self
                    .all_hashes
                    .iter()
                    .map(|hash| {
                        if node.hashes().contains(hash) {
                            1.0
                        } else if node.is_downloading(hash) {
                            0.5
                        } else {
                            0.0
                        }
                    })
                    .collect();

                NodeStatusRow {
                    name: node.name().to_string(),
                    possession,
                    dls: node.active_downloads().len(),
                    uls: node.active_uploads_count(),
                    avg_ul_time: node.avg_ul_time(),
                }
            })
            .collect();

        StatusTable {
            all_hashes: self.all_hashes.clone(),
            nodes,
        }
    }

    /// Rarity of each hash in the universe: the number of alive nodes that
    /// claim to possess it (spec §4.3 step 1).
    #[must_use]
    pub fn rarity(&self) -> HashMap<ChunkHash, usize> {
        let mut rarity: HashMap<ChunkHash, usize> = self.all_hashes.iter().map(|h| (h.clone(), 0)).collect();

        for node in self.nodes.values().filter(|n| n.is_alive()) {
            for hash in node.hashes() {
                if let Some(count) = rarity.get_mut(hash) {
                    *count += 1;
                }
            }
        }

        rarity
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Swarm, SwarmError};
    use swarmcast_primitives::ChunkHash;

    fn universe(hashes: &[&str]) -> Vec<ChunkHash> {
        hashes.iter().map(|h| ChunkHash::from(*h)).collect()
    }

    fn hset(hashes: &[&str]) -> HashSet<ChunkHash> {
        hashes.iter().map(|h| ChunkHash::from(*h)).collect()
    }

    #[test]
    fn node_join_filters_hashes_outside_the_universe() {
        let mut swarm = Swarm::default();
        swarm.reset_hashes(universe(&["a", "b"]));

        let (id, unknown) = swarm.node_join("p1".to_string(), &hset(&["a", "z"]), 1, 1, false, None).unwrap();

        assert_eq!(swarm.node(id).unwrap().hashes(), &hset(&["a"]));
        assert_eq!(unknown, hset(&["z"]));
    }

    #[test]
    fn only_one_master_is_allowed() {
        let mut swarm = Swarm::default();
        swarm.node_join("master".to_string(), &HashSet::new(), 0, 4, true, None).unwrap();

        let result = swarm.node_join("master2".to_string(), &HashSet::new(), 0, 4, true, None);

        assert_eq!(result.unwrap_err(), SwarmError::AlreadyHasMaster);
    }

    #[test]
    fn reset_hashes_sets_the_master_to_the_new_universe_exactly() {
        let mut swarm = Swarm::default();
        let (master_id, _) = swarm.node_join("master".to_string(), &HashSet::new(), 0, 4, true, None).unwrap();

        swarm.reset_hashes(universe(&["a", "b", "c"]));

        assert_eq!(swarm.node(master_id).unwrap().hashes(), &hset(&["a", "b", "c"]));
    }

    #[test]
    fn reset_hashes_drops_stale_hashes_from_peer_nodes() {
        let mut swarm = Swarm::default();
        swarm.reset_hashes(universe(&["a", "b"]));
        let (peer_id, _) = swarm.node_join("p1".to_string(), &hset(&["a", "b"]), 1, 1, false, None).unwrap();

        swarm.reset_hashes(universe(&["a"]));

        assert_eq!(swarm.node(peer_id).unwrap().hashes(), &hset(&["a"]));
    }

    #[test]
    fn destroy_node_is_idempotent() {
        let mut swarm = Swarm::default();
        let (peer_id, _) = swarm.node_join("p1".to_string(), &HashSet::new(), 1, 1, false, None).unwrap();

        swarm.destroy_node(peer_id);
        let after_first = swarm.node(peer_id).is_none();
        swarm.destroy_node(peer_id);

        assert!(after_first);
        assert!(swarm.node(peer_id).is_none());
    }

    #[test]
    fn rarity_counts_only_alive_nodes() {
        let mut swarm = Swarm::default();
        swarm.reset_hashes(universe(&["a", "b"]));
        swarm.node_join("p1".to_string(), &hset(&["a"]), 1, 1, false, None).unwrap();
        let (p2, _) = swarm.node_join("p2".to_string(), &hset(&["a"]), 1, 1, false, None).unwrap();
        swarm.destroy_node(p2);

        let rarity = swarm.rarity();

        assert_eq!(rarity[&ChunkHash::from("a")], 1);
        assert_eq!(rarity[&ChunkHash::from("b")], 0);
    }
}
