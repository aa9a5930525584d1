//! The swarmcast master's swarm graph: C1 (link mapper), C2 (node) and C3
//! (swarm coordinator) from spec §4.
pub mod link;
pub mod node;
pub mod replan;
pub mod swarm;

pub use link::{FullyConnected, LinkMapper};
pub use node::{Client, Node, NodeError, NodeId};
pub use replan::ReplanTrigger;
pub use swarm::{NodeStatusRow, StatusTable, Swarm, SwarmError};
