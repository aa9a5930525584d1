//! The out-of-scope chunk file server: serves `GET /blob/{hash}`, scans a
//! directory tree into a [`swarmcast_primitives::Batch`], and counts active
//! uploads and their durations for the master loop's planner tick to fold
//! back into the master's own node bookkeeping (spec §4.5, §9 "Shared
//! resources and concurrency policy").
pub mod chunking;
pub mod environment;
pub mod server;
pub mod state;
pub mod stats;

pub use environment::{Config, Started};
pub use state::AppState;
