//! Ephemeral configuration builders: every bind address uses port `0` so the
//! operating system picks a free one, and the blob-store root directory is
//! unique per call so parallel tests never collide.
use rand::Rng as _;
use swarmcast_configuration::Configuration;

/// A configuration with every server bound to an OS-assigned ephemeral port.
///
/// Intended for tests that start one or more of the servers themselves and
/// then talk to whatever address they actually bound to.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut configuration = Configuration::default();

    configuration.peer_session.bind_address.set_port(0);
    configuration.blob_store.bind_address.set_port(0);
    configuration.health_check_api.bind_address.set_port(0);
    configuration.blob_store.root_dir = unique_temp_dir();

    configuration
}

/// Same as [`ephemeral`], named for tests that register no services with the
/// `Registar` at all (this schema has no per-service enable/disable toggle to
/// strip, so the two builders currently coincide).
#[must_use]
pub fn ephemeral_with_no_services() -> Configuration {
    ephemeral()
}

fn unique_temp_dir() -> String {
    let suffix: u64 = rand::rng().random();
    std::env::temp_dir().join(format!("swarmcast-test-{suffix}")).display().to_string()
}
