//! C1 Link Mapper: "which peers can talk to which" (spec §4, component C1).
use crate::node::NodeId;

/// Answers whether a sender node is reachable from a receiver node.
///
/// The only implementation this system ships is [`FullyConnected`] — every
/// LAN peer can reach every other peer — but the planner depends on the
/// trait so a topology-aware mapper can be swapped in without touching
/// `swarmcast-transfer-planner`.
pub trait LinkMapper: std::fmt::Debug + Send + Sync {
    /// Whether `from` is allowed to serve a chunk to `to`.
    fn allows(&self, from: NodeId, to: NodeId) -> bool;
}

/// The default link mapper: every node can reach every other node.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullyConnected;

impl LinkMapper for FullyConnected {
    fn allows(&self, _from: NodeId, _to: NodeId) -> bool {
        true
    }
}
