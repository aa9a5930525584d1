//! The swarmcast master: a single-process coordinator that tracks which LAN
//! peers have which chunks of a scanned directory tree, plans rarest-first
//! transfers between them, and speaks a small websocket protocol to direct
//! peer sessions (spec: "swarm master-coordinator").
//!
//! The swarm graph, node bookkeeping and transfer planning live in their own
//! `swarmcast-*` packages; this crate is the composition root that loads
//! configuration, wires those packages to the three axum servers (peer
//! session, blob store, health check), and runs the master loop (batch scan
//! + planner tick) as [`bootstrap::jobs::manager::JobManager`]-tracked tasks.
pub mod app;
pub mod bootstrap;
pub mod container;
pub mod events;
pub mod metrics;

pub use swarmcast_clock::clock::Working as CurrentClock;
