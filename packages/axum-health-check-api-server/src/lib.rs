//! The health-check API: a tiny axum server exposing `GET /health_check`,
//! which probes every service registered in a
//! [`swarmcast_server_lib::registar::Registar`] and reports their status.
pub mod environment;
pub mod handlers;
pub mod resources;
pub mod server;
