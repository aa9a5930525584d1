use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::prometheus::PrometheusSerializable;

#[derive(Debug, Display, Clone, Eq, PartialEq, Default, Deserialize, Serialize, Hash, Ord, PartialOrd)]
pub struct LabelName(String);

impl LabelName {
    /// Creates a new `LabelName` instance.
    ///
    /// # Panics
    ///
    /// Panics if the provided name is empty.
    #[must_use]
    pub fn new(name: &str) -> Self {
        assert!(!name.is_empty(), "Label name cannot be empty.");
        Self(name.to_owned())
    }
}

impl PrometheusSerializable for LabelName {
    /// In Prometheus:
    ///
    /// - Labels may contain ASCII letters, numbers, as well as underscores.
    ///   They must match the regex [a-zA-Z_][a-zA-Z0-9_]*.
    /// - Label names beginning with __ (two "_") are reserved for internal
    ///   use.
    /// - Label values may contain any Unicode characters.
    /// - Labels with an empty label value are considered equivalent to
    ///   labels that do not exist.
    ///
    /// The label name is changed:
    ///
    /// - If a label name starts with, or contains, an invalid character:
    ///   replace character with underscore.
    /// - If th label name starts with two underscores:
    ///   add additional underscore (three underscores total)
    fn to_prometheus(&self) -> String {
        // Replace invalid characters with underscore
        let processed: String = self
            .0
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if i == 0 {
                    if c.is_ascii_alphabetic() || c == '_' {
                        c
                    } else {
                        '_'
                    }
                } else if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        // If the label name starts with two underscores, add an additional
        if processed.starts_with("__") && !processed.starts_with("___") {
            format!("_{processed}")
        } else {
            processed
        }
    }
}

#[macro_export]
macro_rules! label_name {
    ("") => {
        compile_error!("Label name cannot be empty");
    };
    ($name:literal) => {
        $crate::label::name::LabelName::new($name)
    };
    ($name:ident) => {
        $crate::label::name::LabelName::new($name)
    };
}
