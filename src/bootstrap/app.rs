//! Configuration loading and logging initialization, run once at process
//! start before any job is spawned.
use clap::Parser;
use swarmcast_configuration::{Configuration, Info};

use crate::container::AppContainer;

/// Command-line arguments. Every option can also be supplied as an
/// environment variable, matching how the rest of this workspace layers
/// configuration (see `swarmcast-configuration`'s `SWARMCAST_CONFIG_OVERRIDE_*`
/// scheme for overriding individual fields once loaded).
#[derive(Parser, Debug)]
#[command(name = "swarmcast-master", about = "LAN-scoped swarm master coordinator")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "SWARMCAST_CONFIG_TOML_PATH", default_value = "./swarmcast.toml")]
    config_toml_path: String,

    /// Inline TOML configuration content. Takes priority over
    /// `config_toml_path` when set.
    #[arg(long, env = "SWARMCAST_CONFIG_TOML")]
    config_toml: Option<String>,
}

/// Loads configuration, initializes logging, and builds the [`AppContainer`].
///
/// # Panics
///
/// Panics if configuration fails to load (missing mandatory option,
/// unsupported schema version, malformed TOML) — there is no sensible way
/// to run with partial configuration.
#[must_use]
pub fn setup() -> (Configuration, AppContainer) {
    let cli = Cli::parse();

    let info = Info::new(cli.config_toml, cli.config_toml_path);
    let configuration = Configuration::load(&info).unwrap_or_else(|err| panic!("failed to load configuration from {info}: {err}"));

    init_logging(&configuration);

    let app_container = AppContainer::initialize(&configuration);

    (configuration, app_container)
}

fn init_logging(configuration: &Configuration) {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(configuration.logging.threshold.clone()));

    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).json().try_init();
}
