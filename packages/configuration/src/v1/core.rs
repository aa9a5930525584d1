use serde::{Deserialize, Serialize};

use crate::{SemanticValidationError, Validator};

/// Core swarm-coordinator configuration: the knobs spec.md §"Configuration
/// inputs to the core" enumerates (upload-slot count, protocol version,
/// rescan interval, planner tick interval, heartbeat/receive timeouts and
/// the upload-speed average-window size). Chunk size is deliberately absent:
/// it is only ever observed via the `Batch` the chunker produces.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Core {
    /// The number of concurrent uploads the master itself (acting as a seed
    /// node) will serve.
    #[serde(default = "Core::default_upload_slots")]
    pub upload_slots: usize,

    /// The protocol version string advertised during the peer version
    /// handshake (`MAJOR.MINOR.PATCH`); only `MAJOR` is enforced against
    /// peers.
    #[serde(default = "Core::default_protocol_version")]
    pub protocol_version: String,

    /// How often the base directory is rescanned for a new `Batch`.
    #[serde(default = "Core::default_rescan_interval_secs")]
    pub rescan_interval_secs: u64,

    /// Upper bound on how long the planner waits between ticks when no
    /// replan trigger fires first.
    #[serde(default = "Core::default_planner_tick_interval_secs")]
    pub planner_tick_interval_secs: u64,

    /// Websocket heartbeat interval; loss of heartbeat cancels the session.
    #[serde(default = "Core::default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Maximum time to wait for any inbound websocket message before
    /// treating the peer as unresponsive.
    #[serde(default = "Core::default_receive_timeout_secs")]
    pub receive_timeout_secs: u64,

    /// Size of the bounded window of recent per-chunk upload durations used
    /// to derive `avg_ul_time`.
    #[serde(default = "Core::default_avg_window_size")]
    pub avg_window_size: usize,

    /// Default transfer timeout used when a sender has no recorded
    /// `avg_ul_time` yet.
    #[serde(default = "Core::default_transfer_timeout_secs")]
    pub default_transfer_timeout_secs: u64,

    /// Multiplier `k` applied to a sender's `avg_ul_time` to derive a
    /// transfer's `timeout_secs` once that average is known.
    #[serde(default = "Core::default_transfer_timeout_multiplier")]
    pub transfer_timeout_multiplier: u64,

    /// Floor applied to `timeout_secs` regardless of how fast a sender's
    /// average upload time is.
    #[serde(default = "Core::default_min_transfer_timeout_secs")]
    pub min_transfer_timeout_secs: u64,

    /// Maximum number of frames queued for a single peer session before the
    /// session is dropped as a slow consumer.
    #[serde(default = "Core::default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,

    /// A sender's total upload bandwidth budget in bytes/sec, divided by its
    /// `max_concurrent_uls` to derive a transfer's `max_bandwidth` (spec
    /// §4.3 step 6). `0` means uncapped.
    #[serde(default = "Core::default_upload_bandwidth_bytes_per_sec")]
    pub upload_bandwidth_bytes_per_sec: f64,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            upload_slots: Self::default_upload_slots(),
            protocol_version: Self::default_protocol_version(),
            rescan_interval_secs: Self::default_rescan_interval_secs(),
            planner_tick_interval_secs: Self::default_planner_tick_interval_secs(),
            heartbeat_interval_secs: Self::default_heartbeat_interval_secs(),
            receive_timeout_secs: Self::default_receive_timeout_secs(),
            avg_window_size: Self::default_avg_window_size(),
            default_transfer_timeout_secs: Self::default_transfer_timeout_secs(),
            transfer_timeout_multiplier: Self::default_transfer_timeout_multiplier(),
            min_transfer_timeout_secs: Self::default_min_transfer_timeout_secs(),
            outbound_queue_capacity: Self::default_outbound_queue_capacity(),
            upload_bandwidth_bytes_per_sec: Self::default_upload_bandwidth_bytes_per_sec(),
        }
    }
}

impl Core {
    fn default_upload_slots() -> usize {
        4
    }

    fn default_protocol_version() -> String {
        "1.0.0".to_string()
    }

    fn default_rescan_interval_secs() -> u64 {
        30
    }

    fn default_planner_tick_interval_secs() -> u64 {
        2
    }

    fn default_heartbeat_interval_secs() -> u64 {
        20
    }

    fn default_receive_timeout_secs() -> u64 {
        60
    }

    fn default_avg_window_size() -> usize {
        20
    }

    fn default_transfer_timeout_secs() -> u64 {
        60
    }

    fn default_transfer_timeout_multiplier() -> u64 {
        5
    }

    fn default_min_transfer_timeout_secs() -> u64 {
        10
    }

    fn default_outbound_queue_capacity() -> usize {
        256
    }

    fn default_upload_bandwidth_bytes_per_sec() -> f64 {
        0.0
    }
}

impl Validator for Core {
    fn validate(&self) -> Result<(), SemanticValidationError> {
        if self.upload_slots == 0 {
            return Err(SemanticValidationError::UploadSlotsMustBePositive);
        }

        if self.avg_window_size == 0 {
            return Err(SemanticValidationError::AvgWindowSizeMustBePositive);
        }

        Ok(())
    }
}
