//! Configuration for the swarmcast master.
//!
//! The configuration is loaded from a [TOML](https://toml.io/en/) file
//! (`swarmcast.toml` by default) or from an environment variable holding the
//! same content, via [figment](https://docs.rs/figment). Individual options
//! can be overridden with environment variables prefixed
//! `SWARMCAST_CONFIG_OVERRIDE_`, using `__` as the path separator, for
//! example `SWARMCAST_CONFIG_OVERRIDE_CORE__UPLOAD_SLOTS=8`.
//!
//! When no file or env var is provided, [`Configuration::default`] is used.
//!
//! The configuration schema is versioned (see [`Metadata`]); loading fails if
//! the `metadata.schema_version` in the supplied configuration does not match
//! the version this crate implements.
pub mod v1;

use std::fmt;

use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::v1::Configuration;

/// The raw configuration input: either inline TOML content (typically
/// supplied via an environment variable) or a path to a TOML file.
#[derive(Constructor, Clone, Debug, Default)]
pub struct Info {
    /// Inline TOML content. Takes priority over `config_toml_path` when set.
    pub config_toml: Option<String>,

    /// Path to a TOML configuration file, used when `config_toml` is `None`.
    pub config_toml_path: String,
}

/// Metadata identifying the configuration schema.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Metadata {
    /// The application this configuration belongs to.
    pub app: String,

    /// A human-readable description of what this file is for.
    pub purpose: String,

    /// The configuration schema version.
    pub schema_version: Version,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            app: "swarmcast-master".to_string(),
            purpose: "configuration".to_string(),
            schema_version: Version::new("1.0.0"),
        }
    }
}

/// A configuration schema version, compared by exact string match.
#[derive(Display, Constructor, Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Version(String);

impl Version {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// TLS configuration shared by the servers that can terminate TLS directly
/// instead of sitting behind a reverse proxy.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct TslConfig {
    /// Path to the PEM certificate.
    pub ssl_cert_path: String,

    /// Path to the PEM private key.
    pub ssl_key_path: String,
}

/// Errors produced while loading or validating configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {source}")]
    ConfigError {
        #[from]
        source: figment::Error,
    },

    #[error("The schema version of the configuration file is not supported: {version}")]
    UnsupportedVersion { version: Version },

    #[error("Missing mandatory configuration option: {path}")]
    MissingMandatoryOption { path: String },

    #[error("Could not write configuration to file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.config_toml.is_some() {
            write!(f, "inline TOML configuration")
        } else {
            write!(f, "configuration file at {}", self.config_toml_path)
        }
    }
}

/// Validates semantic constraints that the type system alone cannot express.
pub trait Validator {
    /// # Errors
    ///
    /// Returns an error describing the first constraint that does not hold.
    fn validate(&self) -> Result<(), SemanticValidationError>;
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SemanticValidationError {
    #[error("core.upload_slots must be greater than zero")]
    UploadSlotsMustBePositive,

    #[error("core.avg_window_size must be greater than zero")]
    AvgWindowSizeMustBePositive,
}
