use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::prometheus::PrometheusSerializable;

#[derive(Debug, Display, Clone, Eq, PartialEq, Default, Deserialize, Serialize, Hash, Ord, PartialOrd)]
pub struct MetricName(String);

impl MetricName {
    /// Creates a new `MetricName` instance.
    ///
    /// # Panics
    ///
    /// Panics if the provided name is empty.
    #[must_use]
    pub fn new(name: &str) -> Self {
        assert!(!name.is_empty(), "Metric name cannot be empty.");
        Self(name.to_owned())
    }
}

impl PrometheusSerializable for MetricName {
    fn to_prometheus(&self) -> String {
        // Metric names may contain ASCII letters, digits, underscores, and
        // colons. It must match the regex [a-zA-Z_:][a-zA-Z0-9_:]*.
        // If the metric name starts with, or contains, an invalid character:
        // replace character with underscore.

        self.0
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if i == 0 {
                    if c.is_ascii_alphabetic() || c == '_' || c == ':' {
                        c
                    } else {
                        '_'
                    }
                } else if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[macro_export]
macro_rules! metric_name {
    ("") => {
        compile_error!("Metric name cannot be empty");
    };
    ($name:literal) => {
        $crate::metric::name::MetricName::new($name)
    };
    ($name:ident) => {
        $crate::metric::name::MetricName::new($name)
    };
}
