use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::TslConfig;

/// Configuration for the peer-session server: the websocket control channel
/// peers connect to via `GET /join`, plus the cached `GET /` status page.
#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct PeerSession {
    /// The address the server will bind to. Use port `0` to let the
    /// operating system pick a free port.
    #[serde(default = "PeerSession::default_bind_address")]
    pub bind_address: SocketAddr,

    /// TLS config, used when the server terminates TLS itself instead of
    /// sitting behind a reverse proxy.
    #[serde(default = "PeerSession::default_tsl_config")]
    pub tsl_config: Option<TslConfig>,
}

impl Default for PeerSession {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            tsl_config: Self::default_tsl_config(),
        }
    }
}

impl PeerSession {
    fn default_bind_address() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 7272)
    }

    fn default_tsl_config() -> Option<TslConfig> {
        None
    }
}
