//! Version `1` of the swarmcast master configuration schema.
//!
//! The configuration is loaded from a [TOML](https://toml.io/en/) file
//! (`swarmcast.toml` by default) or from an environment variable holding the
//! same content. Options can be overridden individually with environment
//! variables prefixed `SWARMCAST_CONFIG_OVERRIDE_`, using `__` to separate
//! path segments, e.g. `SWARMCAST_CONFIG_OVERRIDE_CORE__UPLOAD_SLOTS=8`.
//!
//! ## Default configuration
//!
//! ```toml
//! [metadata]
//! app = "swarmcast-master"
//! purpose = "configuration"
//! schema_version = "1.0.0"
//!
//! [logging]
//! threshold = "info"
//!
//! [core]
//! upload_slots = 4
//! protocol_version = "1.0.0"
//! rescan_interval_secs = 30
//! planner_tick_interval_secs = 2
//! heartbeat_interval_secs = 20
//! receive_timeout_secs = 60
//! avg_window_size = 20
//! default_transfer_timeout_secs = 60
//! transfer_timeout_multiplier = 5
//! min_transfer_timeout_secs = 10
//! outbound_queue_capacity = 256
//! upload_bandwidth_bytes_per_sec = 0.0
//!
//! [peer_session]
//! bind_address = "0.0.0.0:7272"
//!
//! [blob_store]
//! bind_address = "0.0.0.0:7373"
//! root_dir = "./storage/swarmcast/blobs"
//! chunk_size_bytes = 262144
//!
//! [health_check_api]
//! bind_address = "127.0.0.1:1313"
//! ```
pub mod blob_store;
pub mod core;
pub mod health_check_api;
pub mod logging;
pub mod peer_session;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use self::blob_store::BlobStore;
use self::core::Core;
use self::health_check_api::HealthCheckApi;
use self::logging::Logging;
use self::peer_session::PeerSession;
use crate::{Error, Info, Metadata, SemanticValidationError, Validator, Version};

/// This configuration schema version.
const SCHEMA_VERSION: &str = "1.0.0";

/// Prefix for env vars that override configuration options.
const CONFIG_OVERRIDE_PREFIX: &str = "SWARMCAST_CONFIG_OVERRIDE_";

/// Path separator in env var names for nested configuration values.
const CONFIG_OVERRIDE_SEPARATOR: &str = "__";

/// Swarmcast master configuration.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Configuration {
    /// Configuration metadata.
    pub metadata: Metadata,

    /// Logging configuration.
    pub logging: Logging,

    /// Configuration inputs to the swarm core (spec.md "Configuration inputs
    /// to the core").
    pub core: Core,

    /// The peer-session websocket server.
    pub peer_session: PeerSession,

    /// The out-of-scope chunk file server glue.
    pub blob_store: BlobStore,

    /// The health-check API.
    pub health_check_api: HealthCheckApi,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            metadata: Metadata::default(),
            logging: Logging::default(),
            core: Core::default(),
            peer_session: PeerSession::default(),
            blob_store: BlobStore::default(),
            health_check_api: HealthCheckApi::default(),
        }
    }
}

impl Configuration {
    /// Saves the default configuration at the given path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `path` is not writable.
    pub fn create_default_configuration_file(path: &str) -> Result<Configuration, Error> {
        let config = Configuration::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Loads the configuration from the `Info` struct.
    ///
    /// Configuration supplied inline via `info.config_toml` has priority over
    /// a configuration file path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a mandatory option is missing, the schema version
    /// does not match, or the underlying TOML/env sources cannot be parsed.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = if let Some(config_toml) = &info.config_toml {
            Figment::from(Toml::string(config_toml)).merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR))
        } else {
            Figment::from(Toml::file(&info.config_toml_path))
                .merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR))
        };

        Self::check_mandatory_options(&figment)?;

        let figment = figment.join(Serialized::defaults(Configuration::default()));

        let config: Configuration = figment.extract()?;

        if config.metadata.schema_version != Version::new(SCHEMA_VERSION) {
            return Err(Error::UnsupportedVersion {
                version: config.metadata.schema_version,
            });
        }

        Ok(config)
    }

    /// Some configuration options are mandatory: the master refuses to start
    /// unless the user provides an explicit value for them via TOML or env
    /// var, rather than silently falling back to a default.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first mandatory option without an
    /// explicit value.
    fn check_mandatory_options(figment: &Figment) -> Result<(), Error> {
        let mandatory_options = ["metadata.schema_version", "logging.threshold"];

        for mandatory_option in mandatory_options {
            figment
                .find_value(mandatory_option)
                .map_err(|_err| Error::MissingMandatoryOption {
                    path: mandatory_option.to_owned(),
                })?;
        }

        Ok(())
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file cannot be written.
    pub fn save_to_file(&self, path: &str) -> Result<(), Error> {
        std::fs::write(path, self.to_toml())?;
        Ok(())
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Panics
    ///
    /// Panics if the configuration cannot be encoded (should not happen for
    /// a well-formed `Configuration`).
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string(self).expect("configuration should always encode to TOML")
    }

    /// Encodes the configuration to JSON.
    ///
    /// # Panics
    ///
    /// Panics if the configuration cannot be encoded.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("configuration should always encode to JSON")
    }

    /// Masks secrets in the configuration before it is logged or displayed.
    ///
    /// There are currently no secret-bearing fields in this schema; this
    /// exists so a future field (e.g. an API token) has an obvious place to
    /// plug into, matching how the teacher's HTTP API access tokens are
    /// masked.
    #[must_use]
    pub fn mask_secrets(self) -> Self {
        self
    }
}

impl Validator for Configuration {
    fn validate(&self) -> Result<(), SemanticValidationError> {
        self.core.validate()
    }
}

#[cfg(test)]
mod tests {
    use crate::v1::Configuration;
    use crate::Info;

    #[test]
    fn configuration_should_have_default_values() {
        let configuration = Configuration::default();

        assert_eq!(configuration.core.upload_slots, 4);
        assert_eq!(configuration.core.avg_window_size, 20);
        assert_eq!(configuration.metadata.schema_version.as_str(), "1.0.0");
    }

    #[test]
    fn configuration_should_use_the_default_values_when_only_the_mandatory_options_are_provided_via_toml_content() {
        figment::Jail::expect_with(|_jail| {
            let config_toml = r#"
                [metadata]
                app = "swarmcast-master"
                purpose = "configuration"
                schema_version = "1.0.0"

                [logging]
                threshold = "info"
            "#
            .to_string();

            let info = Info {
                config_toml: Some(config_toml),
                config_toml_path: String::new(),
            };

            let configuration = Configuration::load(&info).expect("should load configuration");

            assert_eq!(configuration, Configuration::default());

            Ok(())
        });
    }

    #[test]
    fn configuration_should_be_overridden_by_an_env_var() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SWARMCAST_CONFIG_OVERRIDE_CORE__UPLOAD_SLOTS", "8");

            let config_toml = r#"
                [metadata]
                app = "swarmcast-master"
                purpose = "configuration"
                schema_version = "1.0.0"

                [logging]
                threshold = "info"
            "#
            .to_string();

            let info = Info {
                config_toml: Some(config_toml),
                config_toml_path: String::new(),
            };

            let configuration = Configuration::load(&info).expect("should load configuration");

            assert_eq!(configuration.core.upload_slots, 8);

            Ok(())
        });
    }

    #[test]
    fn configuration_should_reject_an_unsupported_schema_version() {
        figment::Jail::expect_with(|_jail| {
            let config_toml = r#"
                [metadata]
                app = "swarmcast-master"
                purpose = "configuration"
                schema_version = "99.0.0"

                [logging]
                threshold = "info"
            "#
            .to_string();

            let info = Info {
                config_toml: Some(config_toml),
                config_toml_path: String::new(),
            };

            let result = Configuration::load(&info);

            assert!(result.is_err());

            Ok(())
        });
    }

    #[test]
    fn configuration_should_reject_missing_mandatory_options() {
        figment::Jail::expect_with(|_jail| {
            let info = Info {
                config_toml: Some(String::new()),
                config_toml_path: String::new(),
            };

            let result = Configuration::load(&info);

            assert!(result.is_err());

            Ok(())
        });
    }

    #[test]
    fn configuration_should_be_saved_to_a_toml_file() {
        use std::env;

        use uuid::Uuid;

        let temp_directory = env::temp_dir();
        let temp_file = temp_directory.join(format!("swarmcast_config_{}.toml", Uuid::new_v4()));
        let path = temp_file.to_string_lossy().to_string();

        let configuration = Configuration::default();
        configuration.save_to_file(&path).expect("should save configuration");

        let contents = std::fs::read_to_string(&path).expect("should read the saved file back");

        assert_eq!(contents, configuration.to_toml());
    }
}
