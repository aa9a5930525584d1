use std::collections::hash_map::Iter;
use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use swarmcast_primitives::DurationSinceUnixEpoch;

use super::counter::Counter;
use super::gauge::Gauge;
use super::label::LabelSet;
use super::prometheus::PrometheusSerializable;
use super::sample::Sample;
use crate::sample::Measurement;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleCollection<T> {
    samples: HashMap<LabelSet, Measurement<T>>,
}

impl<T> SampleCollection<T> {
    /// Creates a new `MetricKindCollection` from a vector of metrics
    ///
    /// # Errors
    ///
    /// Returns an error if there are duplicate `LabelSets` in the provided
    /// samples.
    pub fn new(samples: Vec<Sample<T>>) -> Result<Self, Error> {
        let mut map: HashMap<LabelSet, Measurement<T>> = HashMap::with_capacity(samples.len());

        for sample in samples {
            let (label_set, sample_data): (LabelSet, Measurement<T>) = sample.into();

            let label_set_clone = label_set.clone();

            if let Some(_old_measurement) = map.insert(label_set, sample_data) {
                return Err(Error::DuplicateLabelSetInList {
                    label_set: label_set_clone,
                });
            }
        }

        Ok(Self { samples: map })
    }

    #[must_use]
    pub fn get(&self, label: &LabelSet) -> Option<&Measurement<T>> {
        self.samples.get(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, LabelSet, Measurement<T>> {
        self.samples.iter()
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("Found duplicate label set in list. Label set must be unique in a SampleCollection.")]
    DuplicateLabelSetInList { label_set: LabelSet },
}

impl SampleCollection<Counter> {
    pub fn increment(&mut self, label_set: &LabelSet, time: DurationSinceUnixEpoch) {
        let sample = self
            .samples
            .entry(label_set.clone())
            .or_insert_with(|| Measurement::new(Counter::default(), time));

        sample.increment(time);
    }

    pub fn absolute(&mut self, label_set: &LabelSet, value: u64, time: DurationSinceUnixEpoch) {
        let sample = self
            .samples
            .entry(label_set.clone())
            .or_insert_with(|| Measurement::new(Counter::default(), time));

        sample.absolute(value, time);
    }
}

impl SampleCollection<Gauge> {
    pub fn set(&mut self, label_set: &LabelSet, value: f64, time: DurationSinceUnixEpoch) {
        let sample = self
            .samples
            .entry(label_set.clone())
            .or_insert_with(|| Measurement::new(Gauge::default(), time));

        sample.set(value, time);
    }

    pub fn increment(&mut self, label_set: &LabelSet, time: DurationSinceUnixEpoch) {
        let sample = self
            .samples
            .entry(label_set.clone())
            .or_insert_with(|| Measurement::new(Gauge::default(), time));

        sample.increment(time);
    }

    pub fn decrement(&mut self, label_set: &LabelSet, time: DurationSinceUnixEpoch) {
        let sample = self
            .samples
            .entry(label_set.clone())
            .or_insert_with(|| Measurement::new(Gauge::default(), time));

        sample.decrement(time);
    }
}

impl<T: Serialize> Serialize for SampleCollection<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut samples: Vec<Sample<&T>> = vec![];

        for (label_set, sample_data) in &self.samples {
            samples.push(Sample::new(sample_data.value(), sample_data.recorded_at(), label_set.clone()));
        }

        samples.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for SampleCollection<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let samples = Vec::<Sample<T>>::deserialize(deserializer)?;

        let sample_collection = SampleCollection::new(samples).map_err(serde::de::Error::custom)?;

        Ok(sample_collection)
    }
}

impl<T: PrometheusSerializable> PrometheusSerializable for SampleCollection<T> {
    fn to_prometheus(&self) -> String {
        let mut output = String::new();

        for (label_set, sample_data) in &self.samples {
            if label_set.is_empty() {
                let _ = write!(output, "{}", sample_data.to_prometheus());
            } else {
                let _ = write!(output, "{} {}", label_set.to_prometheus(), sample_data.to_prometheus());
            }
        }

        output
    }
}
