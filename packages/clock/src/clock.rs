//! The `Time` trait and its two implementations.
//!
//! Production code runs on [`Working`], which reads the OS clock. Tests run
//! on [`Stopped`], which freezes time at the instant it's first read and
//! lets a test override that instant with [`Stopped::local_set`].
use std::time::SystemTime;

use swarmcast_primitives::DurationSinceUnixEpoch;

use crate::static_time;

/// A source of the current time, abstracted so production code never calls
/// `SystemTime::now()` directly.
pub trait Time: Sized + Default {
    /// Returns the current time as a duration since the Unix epoch.
    #[must_use]
    fn now() -> DurationSinceUnixEpoch;

    /// Returns `now() + amount`, saturating instead of overflowing.
    #[must_use]
    fn now_add(amount: &DurationSinceUnixEpoch) -> Option<DurationSinceUnixEpoch> {
        Self::now().checked_add(*amount)
    }

    /// Returns `now() - amount`, saturating instead of underflowing.
    #[must_use]
    fn now_sub(amount: &DurationSinceUnixEpoch) -> Option<DurationSinceUnixEpoch> {
        Self::now().checked_sub(*amount)
    }
}

/// Reads the real OS clock. Used outside of `#[cfg(test)]` builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct Working;

impl Time for Working {
    fn now() -> DurationSinceUnixEpoch {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("the system clock must not be set before the Unix epoch")
    }
}

/// A frozen clock for deterministic tests.
///
/// The first call to `now()` in a test process latches to the time recorded
/// at application start (see [`static_time`]); call [`Stopped::local_set`]
/// to move it to an arbitrary instant for that test.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stopped;

impl Stopped {
    thread_local!(static TIME: std::cell::RefCell<DurationSinceUnixEpoch>  = std::cell::RefCell::new(*static_time::TIME_AT_APP_START));

    /// Overrides the frozen time for the current thread.
    pub fn local_set(time: &DurationSinceUnixEpoch) {
        Self::TIME.with(|time_cell| {
            *time_cell.borrow_mut() = *time;
        });
    }

    /// Advances the frozen time for the current thread by `amount`.
    pub fn local_add(amount: &DurationSinceUnixEpoch) {
        Self::TIME.with(|time_cell| {
            let current = *time_cell.borrow();
            if let Some(new_time) = current.checked_add(*amount) {
                *time_cell.borrow_mut() = new_time;
            }
        });
    }

    fn local_now() -> DurationSinceUnixEpoch {
        Self::TIME.with(|time_cell| *time_cell.borrow())
    }
}

impl Time for Stopped {
    fn now() -> DurationSinceUnixEpoch {
        Self::local_now()
    }
}
