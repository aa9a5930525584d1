//! Counters the file server publishes and the master loop reads (and
//! clears) on every planner tick (spec §4.5 flow step 2, §5 "shared
//! resource policy").
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct Stats {
    active_uploads: AtomicU64,
    upload_durations: Mutex<Vec<f64>>,
}

impl Stats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_started(&self) {
        self.active_uploads.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn upload_finished(&self, duration_secs: f64) {
        self.active_uploads.fetch_sub(1, Ordering::SeqCst);
        self.upload_durations.lock().await.push(duration_secs);
    }

    #[must_use]
    pub fn active_uploads(&self) -> u64 {
        self.active_uploads.load(Ordering::SeqCst)
    }

    /// Drains the recorded upload durations, leaving the counter empty for
    /// the next tick (spec §4.5: "clear those counters").
    pub async fn take_upload_durations(&self) -> Vec<f64> {
        std::mem::take(&mut *self.upload_durations.lock().await)
    }
}
