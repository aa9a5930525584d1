use crate::counter::Counter;
use crate::gauge::Gauge;
use crate::label::LabelSet;
use crate::metric::aggregate::sum::Sum as MetricSumTrait;
use crate::metric::MetricName;
use crate::metric_collection::{MetricCollection, MetricKindCollection};

pub trait Sum {
    fn sum(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64>;
}

impl Sum for MetricCollection {
    fn sum(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64> {
        if let Some(value) = self.counters.sum(metric_name, label_set_criteria) {
            return Some(value);
        }

        if let Some(value) = self.gauges.sum(metric_name, label_set_criteria) {
            return Some(value);
        }

        None
    }
}

impl Sum for MetricKindCollection<Counter> {
    fn sum(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64> {
        #[allow(clippy::cast_precision_loss)]
        self.metrics
            .get(metric_name)
            .map(|metric| metric.sum(label_set_criteria) as f64)
    }
}

impl Sum for MetricKindCollection<Gauge> {
    fn sum(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64> {
        self.metrics.get(metric_name).map(|metric| metric.sum(label_set_criteria))
    }
}
