use std::collections::btree_map::Iter;
use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{LabelName, LabelPair, LabelValue};
use crate::prometheus::PrometheusSerializable;

#[derive(Debug, Clone, Eq, PartialEq, Default, Ord, PartialOrd, Hash)]
pub struct LabelSet {
    items: BTreeMap<LabelName, LabelValue>,
}

impl LabelSet {
    #[must_use]
    pub fn empty() -> Self {
        Self { items: BTreeMap::new() }
    }

    /// Insert a new label pair or update the value of an existing label.
    pub fn upsert(&mut self, name: LabelName, value: LabelValue) {
        self.items.insert(name, value);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_pair(&self, name: &LabelName, value: &LabelValue) -> bool {
        match self.items.get(name) {
            Some(existing_value) => existing_value == value,
            None => false,
        }
    }

    pub fn matches(&self, criteria: &LabelSet) -> bool {
        criteria.iter().all(|(name, value)| self.contains_pair(name, value))
    }

    pub fn iter(&self) -> Iter<'_, LabelName, LabelValue> {
        self.items.iter()
    }
}

impl Display for LabelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items = self
            .items
            .iter()
            .map(|(name, value)| format!("{name}=\"{value}\""))
            .collect::<Vec<_>>()
            .join(",");

        write!(f, "{{{items}}}")
    }
}

impl From<BTreeMap<LabelName, LabelValue>> for LabelSet {
    fn from(values: BTreeMap<LabelName, LabelValue>) -> Self {
        Self { items: values }
    }
}

impl From<Vec<(&str, &str)>> for LabelSet {
    fn from(vec: Vec<(&str, &str)>) -> Self {
        let mut items = BTreeMap::new();

        for (name, value) in vec {
            items.insert(LabelName::new(name), LabelValue::new(value));
        }

        Self { items }
    }
}

impl From<Vec<(String, String)>> for LabelSet {
    fn from(vec: Vec<(String, String)>) -> Self {
        let mut items = BTreeMap::new();

        for (name, value) in vec {
            items.insert(LabelName::new(&name), LabelValue::new(&value));
        }

        Self { items }
    }
}

impl From<Vec<LabelPair>> for LabelSet {
    fn from(vec: Vec<LabelPair>) -> Self {
        let mut items = BTreeMap::new();

        for (name, value) in vec {
            items.insert(name, value);
        }

        Self { items }
    }
}

impl From<Vec<SerializedLabel>> for LabelSet {
    fn from(vec: Vec<SerializedLabel>) -> Self {
        let mut items = BTreeMap::new();

        for serialized_label in vec {
            items.insert(serialized_label.name, serialized_label.value);
        }

        Self { items }
    }
}

impl<const N: usize> From<[LabelPair; N]> for LabelSet {
    fn from(arr: [LabelPair; N]) -> Self {
        let values = BTreeMap::from(arr);
        Self { items: values }
    }
}

impl<const N: usize> From<[(String, String); N]> for LabelSet {
    fn from(arr: [(String, String); N]) -> Self {
        let values = arr
            .iter()
            .map(|(name, value)| (LabelName::new(name), LabelValue::new(value)))
            .collect::<BTreeMap<_, _>>();
        Self { items: values }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LabelSet {
    fn from(arr: [(&str, &str); N]) -> Self {
        let values = arr
            .iter()
            .map(|(name, value)| (LabelName::new(name), LabelValue::new(value)))
            .collect::<BTreeMap<_, _>>();
        Self { items: values }
    }
}

impl From<LabelPair> for LabelSet {
    fn from(label_pair: LabelPair) -> Self {
        let mut set = BTreeMap::new();

        set.insert(label_pair.0, label_pair.1);

        Self { items: set }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize, Serialize)]
struct SerializedLabel {
    name: LabelName,
    value: LabelValue,
}

impl Serialize for LabelSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.items
            .iter()
            .map(|(name, value)| SerializedLabel {
                name: name.clone(),
                value: value.clone(),
            })
            .collect::<Vec<_>>()
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let serialized_labels = Vec::<SerializedLabel>::deserialize(deserializer)?;

        Ok(LabelSet::from(serialized_labels))
    }
}

impl PrometheusSerializable for LabelSet {
    fn to_prometheus(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let items = self.items.iter().fold(String::new(), |mut output, label_pair| {
            if !output.is_empty() {
                output.push(',');
            }

            output.push_str(&label_pair.to_prometheus());

            output
        });

        format!("{{{items}}}")
    }
}
