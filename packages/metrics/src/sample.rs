use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use swarmcast_primitives::DurationSinceUnixEpoch;

use super::counter::Counter;
use super::gauge::Gauge;
use super::label::LabelSet;
use super::prometheus::PrometheusSerializable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    #[serde(flatten)]
    measurement: Measurement<T>,

    #[serde(rename = "labels")]
    label_set: LabelSet,
}

impl<T> Sample<T> {
    #[must_use]
    pub fn new(value: T, recorded_at: DurationSinceUnixEpoch, label_set: LabelSet) -> Self {
        let data = Measurement { value, recorded_at };

        Self {
            measurement: data,
            label_set,
        }
    }

    #[must_use]
    pub fn measurement(&self) -> &Measurement<T> {
        &self.measurement
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.measurement.value
    }

    #[must_use]
    pub fn recorded_at(&self) -> DurationSinceUnixEpoch {
        self.measurement.recorded_at
    }

    #[must_use]
    pub fn labels(&self) -> &LabelSet {
        &self.label_set
    }
}

impl<T: PrometheusSerializable> PrometheusSerializable for Sample<T> {
    fn to_prometheus(&self) -> String {
        if self.label_set.is_empty() {
            format!(" {}", self.measurement.to_prometheus())
        } else {
            format!("{} {}", self.label_set.to_prometheus(), self.measurement.to_prometheus())
        }
    }
}

impl Sample<Counter> {
    pub fn increment(&mut self, time: DurationSinceUnixEpoch) {
        self.measurement.increment(time);
    }
}

impl Sample<Gauge> {
    pub fn set(&mut self, value: f64, time: DurationSinceUnixEpoch) {
        self.measurement.set(value, time);
    }

    pub fn increment(&mut self, time: DurationSinceUnixEpoch) {
        self.measurement.increment(time);
    }

    pub fn decrement(&mut self, time: DurationSinceUnixEpoch) {
        self.measurement.decrement(time);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement<T> {
    /// The value of the sample.
    value: T,

    /// The time when the sample was last updated.
    #[serde(serialize_with = "serialize_duration", deserialize_with = "deserialize_duration")]
    recorded_at: DurationSinceUnixEpoch,
}

impl<T> Measurement<T> {
    #[must_use]
    pub fn new(value: T, recorded_at: DurationSinceUnixEpoch) -> Self {
        Self { value, recorded_at }
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn recorded_at(&self) -> DurationSinceUnixEpoch {
        self.recorded_at
    }

    fn set_recorded_at(&mut self, time: DurationSinceUnixEpoch) {
        self.recorded_at = time;
    }
}

impl<T> From<Sample<T>> for (LabelSet, Measurement<T>) {
    fn from(sample: Sample<T>) -> Self {
        (sample.label_set, sample.measurement)
    }
}

impl<T: PrometheusSerializable> PrometheusSerializable for Measurement<T> {
    fn to_prometheus(&self) -> String {
        self.value.to_prometheus()
    }
}

impl Measurement<Counter> {
    pub fn increment(&mut self, time: DurationSinceUnixEpoch) {
        self.value.increment(1);
        self.set_recorded_at(time);
    }

    pub fn absolute(&mut self, value: u64, time: DurationSinceUnixEpoch) {
        self.value.absolute(value);
        self.set_recorded_at(time);
    }
}

impl Measurement<Gauge> {
    pub fn set(&mut self, value: f64, time: DurationSinceUnixEpoch) {
        self.value.set(value);
        self.set_recorded_at(time);
    }

    pub fn increment(&mut self, time: DurationSinceUnixEpoch) {
        self.value.increment(1.0);
        self.set_recorded_at(time);
    }

    pub fn decrement(&mut self, time: DurationSinceUnixEpoch) {
        self.value.decrement(1.0);
        self.set_recorded_at(time);
    }
}

/// Serializes the `recorded_at` field as a string in ISO 8601 format (RFC 3339).
///
/// # Errors
///
/// Returns an error if:
/// - The conversion from `u64` to `i64` fails.
/// - The timestamp is invalid.
fn serialize_duration<S>(duration: &DurationSinceUnixEpoch, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let secs = i64::try_from(duration.as_secs()).map_err(|_| serde::ser::Error::custom("Timestamp too large"))?;
    let nanos = duration.subsec_nanos();

    let datetime = DateTime::from_timestamp(secs, nanos).ok_or_else(|| serde::ser::Error::custom("Invalid timestamp"))?;

    serializer.serialize_str(&datetime.to_rfc3339()) // Serializes as ISO 8601 (RFC 3339)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<DurationSinceUnixEpoch, D::Error>
where
    D: Deserializer<'de>,
{
    // Deserialize theISO 8601 (RFC 3339) formatted string
    let datetime_str = String::deserialize(deserializer)?;

    let datetime =
        DateTime::parse_from_rfc3339(&datetime_str).map_err(|e| de::Error::custom(format!("Invalid datetime format: {e}")))?;

    let datetime_utc = datetime.with_timezone(&Utc);

    let secs = u64::try_from(datetime_utc.timestamp()).map_err(|_| de::Error::custom("Timestamp out of range"))?;

    Ok(DurationSinceUnixEpoch::new(secs, datetime_utc.timestamp_subsec_nanos()))
}
