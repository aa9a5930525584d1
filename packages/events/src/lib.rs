pub mod broadcaster;
pub mod bus;
pub mod receiver;
pub mod sender;

/// Target for tracing crate logs.
pub const EVENTS_TARGET: &str = "EVENTS";
