use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Logging {
    /// The minimum level of events to log.
    #[serde(default = "Logging::default_threshold")]
    pub threshold: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            threshold: Self::default_threshold(),
        }
    }
}

impl Logging {
    fn default_threshold() -> String {
        "info".to_string()
    }
}
