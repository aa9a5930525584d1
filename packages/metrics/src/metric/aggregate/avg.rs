use crate::counter::Counter;
use crate::gauge::Gauge;
use crate::label::LabelSet;
use crate::metric::aggregate::sum::Sum;
use crate::metric::Metric;

pub trait Avg {
    type Output;
    fn avg(&self, label_set_criteria: &LabelSet) -> Self::Output;
}

impl Avg for Metric<Counter> {
    type Output = f64;

    fn avg(&self, label_set_criteria: &LabelSet) -> Self::Output {
        let matching_samples = self.collect_matching_samples(label_set_criteria);

        if matching_samples.is_empty() {
            return 0.0;
        }

        let sum = self.sum(label_set_criteria);

        #[allow(clippy::cast_precision_loss)]
        (sum as f64 / matching_samples.len() as f64)
    }
}

impl Avg for Metric<Gauge> {
    type Output = f64;

    fn avg(&self, label_set_criteria: &LabelSet) -> Self::Output {
        let matching_samples = self.collect_matching_samples(label_set_criteria);

        if matching_samples.is_empty() {
            return 0.0;
        }

        let sum = self.sum(label_set_criteria);

        #[allow(clippy::cast_precision_loss)]
        (sum / matching_samples.len() as f64)
    }
}
