//! The JSON shape of a `GET /health_check` response.
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Overall health of the registered services.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No services were registered when the check ran.
    None,
    /// Every registered service answered successfully.
    Ok,
    /// At least one registered service failed to answer.
    Error,
}

/// The health-check result for one registered service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    /// The address the service is bound to.
    pub binding: SocketAddr,

    /// `Ok(status line)` if the probe succeeded, `Err(message)` otherwise.
    pub result: Result<String, String>,

    /// A human-readable description of what was checked.
    pub info: String,
}

/// A `GET /health_check` response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub status: Status,
    pub message: String,
    pub details: Vec<Detail>,
}
