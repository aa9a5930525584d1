//! Aggregate swarm counters, tracked the way the teacher's activity-metrics
//! job tracks seeder/leecher counts — plain [`swarmcast_metrics::counter::Counter`]
//! fields behind a mutex, logged periodically rather than served over an
//! HTTP `/metrics` endpoint (spec.md names no such endpoint).
use std::sync::Mutex;

use swarmcast_metrics::counter::Counter;

#[derive(Debug, Default)]
struct Inner {
    nodes_joined: Counter,
    nodes_destroyed: Counter,
    batches_assimilated: Counter,
    transfers_scheduled: Counter,
}

#[derive(Debug, Default)]
pub struct MasterMetrics {
    inner: Mutex<Inner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub nodes_joined: u64,
    pub nodes_destroyed: u64,
    pub batches_assimilated: u64,
    pub transfers_scheduled: u64,
}

impl MasterMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_node_joined(&self) {
        self.inner.lock().unwrap().nodes_joined.increment(1);
    }

    pub fn record_node_destroyed(&self) {
        self.inner.lock().unwrap().nodes_destroyed.increment(1);
    }

    pub fn record_batch_assimilated(&self) {
        self.inner.lock().unwrap().batches_assimilated.increment(1);
    }

    pub fn record_transfers_scheduled(&self, count: u64) {
        self.inner.lock().unwrap().transfers_scheduled.increment(count);
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.lock().unwrap();
        Snapshot {
            nodes_joined: inner.nodes_joined.value(),
            nodes_destroyed: inner.nodes_destroyed.value(),
            batches_assimilated: inner.batches_assimilated.value(),
            transfers_scheduled: inner.transfers_scheduled.value(),
        }
    }
}
