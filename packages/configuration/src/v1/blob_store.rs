use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Configuration for the out-of-scope chunk file server glue (`GET
/// /blob/{hash}`). This is deliberately minimal: the planner only ever
/// reads the active-upload counters it publishes.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct BlobStore {
    /// The address the blob server will bind to.
    #[serde(default = "BlobStore::default_bind_address")]
    pub bind_address: SocketAddr,

    /// The root directory served as `/blob/{hash}`.
    #[serde(default = "BlobStore::default_root_dir")]
    pub root_dir: String,

    /// Chunk size used by the directory scanner when it splits files into
    /// content-addressed chunks. spec.md deliberately excludes chunk size
    /// from "Configuration inputs to the core" (the planner only observes
    /// it via `Batch`), so this lives on the out-of-scope scanner's own
    /// config section rather than `core`.
    #[serde(default = "BlobStore::default_chunk_size_bytes")]
    pub chunk_size_bytes: u64,
}

impl Default for BlobStore {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            root_dir: Self::default_root_dir(),
            chunk_size_bytes: Self::default_chunk_size_bytes(),
        }
    }
}

impl BlobStore {
    fn default_bind_address() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 7373)
    }

    fn default_root_dir() -> String {
        "./storage/swarmcast/blobs".to_string()
    }

    fn default_chunk_size_bytes() -> u64 {
        256 * 1024
    }
}
