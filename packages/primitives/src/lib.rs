//! Primitive types shared by the swarmcast master packages.
//!
//! These types have no behaviour of their own beyond construction and
//! equality/ordering; the coordination logic that uses them lives in
//! `swarmcast-swarm-core` and `swarmcast-transfer-planner`.
use std::time::Duration;

pub mod batch;
pub mod chunk_hash;
pub mod service_binding;

/// A point in time expressed as a duration since the Unix epoch, matching
/// the convention used throughout the swarm core for `updated`/`timeout`
/// bookkeeping.
pub type DurationSinceUnixEpoch = Duration;

pub use batch::{Batch, ChunkRecord, FileRecord};
pub use chunk_hash::ChunkHash;
