use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::prometheus::PrometheusSerializable;

#[derive(Debug, Display, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gauge(f64);

impl Gauge {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn primitive(&self) -> f64 {
        self.value()
    }

    pub fn set(&mut self, value: f64) {
        self.0 = value;
    }

    pub fn increment(&mut self, value: f64) {
        self.0 += value;
    }

    pub fn decrement(&mut self, value: f64) {
        self.0 -= value;
    }
}

impl From<f32> for Gauge {
    fn from(value: f32) -> Self {
        Self(f64::from(value))
    }
}

impl From<f64> for Gauge {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Gauge> for f64 {
    fn from(counter: Gauge) -> Self {
        counter.value()
    }
}

impl PrometheusSerializable for Gauge {
    fn to_prometheus(&self) -> String {
        format!("{}", self.value())
    }
}
