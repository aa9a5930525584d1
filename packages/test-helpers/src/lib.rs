//! Test helpers shared by this workspace's integration tests: ephemeral
//! configuration builders and a one-time logging setup.
pub mod configuration;
pub mod logging;
