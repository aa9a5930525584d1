//! C5 Peer Session: the websocket-framed message loop per connected peer,
//! bridging the wire protocol (`swarmcast-peer-protocol`) to the swarm core
//! (`swarmcast-swarm-core`). Exposes `GET /join` (the websocket endpoint)
//! and a cached `GET /` human status page (spec §4.2, §4.4, §9).
pub mod debug_injector;
pub mod environment;
pub mod router;
pub mod session;
pub mod socket;
pub mod state;
pub mod status;

pub use environment::{Config, Started};
pub use state::AppState;
