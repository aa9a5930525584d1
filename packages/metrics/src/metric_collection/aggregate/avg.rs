use crate::counter::Counter;
use crate::gauge::Gauge;
use crate::label::LabelSet;
use crate::metric::aggregate::avg::Avg as MetricAvgTrait;
use crate::metric::MetricName;
use crate::metric_collection::{MetricCollection, MetricKindCollection};

pub trait Avg {
    fn avg(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64>;
}

impl Avg for MetricCollection {
    fn avg(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64> {
        if let Some(value) = self.counters.avg(metric_name, label_set_criteria) {
            return Some(value);
        }

        if let Some(value) = self.gauges.avg(metric_name, label_set_criteria) {
            return Some(value);
        }

        None
    }
}

impl Avg for MetricKindCollection<Counter> {
    fn avg(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64> {
        self.metrics.get(metric_name).map(|metric| metric.avg(label_set_criteria))
    }
}

impl Avg for MetricKindCollection<Gauge> {
    fn avg(&self, metric_name: &MetricName, label_set_criteria: &LabelSet) -> Option<f64> {
        self.metrics.get(metric_name).map(|metric| metric.avg(label_set_criteria))
    }
}
