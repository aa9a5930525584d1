//! One-time `tracing` subscriber setup for integration tests.
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a `tracing` subscriber writing to the test harness's captured
/// output, honoring `RUST_LOG` if set and defaulting to `info` otherwise.
///
/// Safe to call from every test: only the first call takes effect.
pub fn setup() {
    INIT.call_once(|| {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).with_test_writer().try_init();
    });
}
