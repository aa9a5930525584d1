//! The JSON-over-websocket wire protocol spoken between the swarmcast
//! master and a connected peer (spec: peer control protocol).
//!
//! Every frame is a single JSON object tagged by its `action` field.
//! Inbound frames (peer -> master) are parsed strictly: [`parse_inbound`]
//! distinguishes a frame with no `action` at all, an unrecognised action,
//! and a recognised action with missing/mistyped arguments, so the session
//! layer can apply the right fatal-vs-transient policy for the state it is
//! currently in.
use std::fmt;

use serde::{Deserialize, Serialize};
use swarmcast_primitives::{Batch, ChunkHash};

/// One in-flight download a peer reports via `report_transfers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedDownload {
    pub hash: ChunkHash,
    pub url: String,
    #[serde(default)]
    pub mbps_limit: Option<f64>,
}

/// A peer -> master frame, already validated to be one of the actions the
/// master understands with syntactically well-formed arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Inbound {
    Version {
        protocol: String,
        app: String,
    },
    JoinSwarm {
        hashes: Vec<ChunkHash>,
        dl_url: String,
        concurrent_transfers: i64,
        nick: String,
    },
    SetHashes {
        hashes: Vec<ChunkHash>,
    },
    AddHashes {
        hashes: Vec<ChunkHash>,
    },
    ReportTransfers {
        dls: Vec<ReportedDownload>,
        ul_count: usize,
        #[serde(default)]
        ul_times: Vec<f64>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

impl Inbound {
    /// The action names this protocol recognises, used by [`parse_inbound`]
    /// to tell an unknown action apart from a malformed known one.
    const KNOWN_ACTIONS: &'static [&'static str] =
        &["version", "join_swarm", "set_hashes", "add_hashes", "report_transfers", "error"];
}

/// Why an inbound frame could not be turned into an [`Inbound`].
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("frame is not a JSON object: {0}")]
    NotAnObject(serde_json::Error),

    #[error("frame has no `action` field")]
    MissingAction,

    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("invalid arguments for action `{action}`: {source}")]
    InvalidArgs { action: String, source: serde_json::Error },
}

/// Parses one websocket text frame into an [`Inbound`] message.
///
/// # Errors
///
/// Returns [`ParseError::NotAnObject`] / [`ParseError::MissingAction`] when
/// the frame is not even a tagged JSON object, [`ParseError::UnknownAction`]
/// when `action` is not one of [`Inbound::KNOWN_ACTIONS`], and
/// [`ParseError::InvalidArgs`] when the action is known but a required
/// argument is missing or the wrong type.
pub fn parse_inbound(text: &str) -> Result<Inbound, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(ParseError::NotAnObject)?;

    let action = value
        .get("action")
        .and_then(serde_json::Value::as_str)
        .ok_or(ParseError::MissingAction)?
        .to_string();

    if !Inbound::KNOWN_ACTIONS.contains(&action.as_str()) {
        return Err(ParseError::UnknownAction(action));
    }

    serde_json::from_value(value).map_err(|source| ParseError::InvalidArgs { action, source })
}

/// A master -> peer frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Outbound {
    Ok {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        orig_msg: Option<serde_json::Value>,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        orig_msg: Option<serde_json::Value>,
    },
    Fatal {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        orig_msg: Option<serde_json::Value>,
    },
    InitialBatch {
        message: String,
        data: Batch,
    },
    NewBatch {
        data: Batch,
    },
    Rehash {
        message: String,
        unknown_hashes: Vec<ChunkHash>,
    },
    Download {
        hash: ChunkHash,
        url: String,
        timeout: u64,
        max_rate: f64,
    },
}

impl Outbound {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self::Ok {
            message: message.into(),
            orig_msg: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            orig_msg: None,
        }
    }

    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
            orig_msg: None,
        }
    }

    /// Whether sending this frame must be followed by closing the session.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// Encodes this frame as a single JSON line, the form it is sent over
    /// the websocket as.
    ///
    /// # Panics
    ///
    /// Panics if the frame cannot be encoded, which does not happen for a
    /// well-formed `Outbound` (all field types are serializable).
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("an Outbound frame must always encode to JSON")
    }
}

/// A `MAJOR.MINOR.PATCH` protocol version. Only `MAJOR` is ever compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed protocol version `{0}`, expected MAJOR.MINOR.PATCH")]
pub struct MalformedVersion(pub String);

impl ProtocolVersion {
    /// # Errors
    ///
    /// Returns [`MalformedVersion`] if `s` is not three dot-separated
    /// unsigned integers.
    pub fn parse(s: &str) -> Result<Self, MalformedVersion> {
        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(MalformedVersion(s.to_string()));
        };

        let parse_part = |p: &str| p.parse::<u32>().map_err(|_err| MalformedVersion(s.to_string()));

        Ok(Self {
            major: parse_part(major)?,
            minor: parse_part(minor)?,
            patch: parse_part(patch)?,
        })
    }

    /// Whether `self` and `other` agree on the `MAJOR` component: the only
    /// part of the version the handshake enforces.
    #[must_use]
    pub fn major_matches(&self, other: &Self) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Whether `dl_url` is a valid download-URL template: it must contain the
/// literal `{hash}` placeholder the master substitutes in `download`
/// orders.
#[must_use]
pub fn is_valid_dl_url_template(dl_url: &str) -> bool {
    dl_url.contains("{hash}")
}
