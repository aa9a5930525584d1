//! Application setup: configuration loading, logging initialization, and
//! the jobs the master loop runs as background tasks.
pub mod app;
pub mod jobs;
