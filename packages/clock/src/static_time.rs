//! Process-wide static values computed once, lazily, the first time they are
//! touched.
use swarmcast_primitives::DurationSinceUnixEpoch;

use crate::clock::{Time, Working};

lazy_static! {
    /// The time the process started, used as the default instant for the
    /// [`crate::clock::Stopped`] clock before any test overrides it.
    pub static ref TIME_AT_APP_START: DurationSinceUnixEpoch = Working::now();
}
