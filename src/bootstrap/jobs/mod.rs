//! Background jobs the master loop runs, each tracked by [`manager::JobManager`].
//!
//! Two jobs drive the swarm itself (spec §4.5 "Master loop"):
//!
//! - [`batch_scan`]: periodically rescans the blob store's root directory
//!   and assimilates any resulting change into the swarm.
//! - [`planner_tick`]: runs the transfer planner on replan-trigger or on a
//!   periodic safety-net tick, dispatching `download` orders and folding the
//!   blob store's upload-duration samples back into node bookkeeping.
pub mod batch_scan;
pub mod manager;
pub mod planner_tick;
