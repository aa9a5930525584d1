use crate::counter::Counter;
use crate::gauge::Gauge;
use crate::label::LabelSet;
use crate::metric::Metric;

pub trait Sum {
    type Output;
    fn sum(&self, label_set_criteria: &LabelSet) -> Self::Output;
}

impl Sum for Metric<Counter> {
    type Output = u64;

    fn sum(&self, label_set_criteria: &LabelSet) -> Self::Output {
        self.sample_collection
            .iter()
            .filter(|(label_set, _measurement)| label_set.matches(label_set_criteria))
            .map(|(_label_set, measurement)| measurement.value().primitive())
            .sum()
    }
}

impl Sum for Metric<Gauge> {
    type Output = f64;

    fn sum(&self, label_set_criteria: &LabelSet) -> Self::Output {
        self.sample_collection
            .iter()
            .filter(|(label_set, _measurement)| label_set.matches(label_set_criteria))
            .map(|(_label_set, measurement)| measurement.value().primitive())
            .sum()
    }
}
