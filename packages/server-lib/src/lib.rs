//! Functionality shared by every HTTP(S)/websocket server the swarmcast
//! master runs: the health-check registration form (`registar`) and the
//! graceful-shutdown signal helpers (`signals`).
pub mod registar;
pub mod signals;
