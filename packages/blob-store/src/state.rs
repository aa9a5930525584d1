use std::sync::Arc;

use swarmcast_primitives::Batch;
use tokio::sync::Mutex;

use crate::stats::Stats;

/// Shared state handed to the blob-server's handlers: where chunks live on
/// disk, the current authoritative [`Batch`] (to resolve a hash to its
/// `{path, pos, size}`), and the upload counters the master loop reads.
#[derive(Clone)]
pub struct AppState {
    pub root_dir: String,
    pub batch: Arc<Mutex<Batch>>,
    pub stats: Arc<Stats>,
}

impl AppState {
    #[must_use]
    pub fn new(root_dir: String, batch: Arc<Mutex<Batch>>) -> Self {
        Self {
            root_dir,
            batch,
            stats: Arc::new(Stats::new()),
        }
    }
}
