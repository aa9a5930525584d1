//! The one-shot, edge-triggered signal that causes the planner to run at
//! the next opportunity (spec §4.5, §9 "Replan trigger").
use std::time::Duration;

use tokio::sync::Notify;

/// Many producers (message handlers, batch changes) call [`ReplanTrigger::fire`];
/// one consumer (the master loop's planner tick) calls
/// [`ReplanTrigger::wait`]. It is deliberately *not* coupled to any
/// planner-internal state: firing it merely wakes up whoever is waiting.
#[derive(Debug, Default)]
pub struct ReplanTrigger(Notify);

impl ReplanTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self(Notify::new())
    }

    /// Signals that a replan should run at the next opportunity.
    pub fn fire(&self) {
        self.0.notify_one();
    }

    /// Waits for [`ReplanTrigger::fire`], or for `timeout` to elapse,
    /// whichever comes first. The coarse periodic tick (spec: "planning
    /// always also runs ... as a safety net") is implemented by the caller
    /// treating a timeout the same as an explicit fire.
    pub async fn wait(&self, timeout: Duration) {
        let _ = tokio::time::timeout(timeout, self.0.notified()).await;
    }
}
