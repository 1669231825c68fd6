use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AttemptLabel, LABEL_APP, LABEL_TRAINING_ATTEMPT, WorkerIndex};

/// Resource metadata labels.
///
/// Backed by a [`BTreeMap`] so iteration (and therefore the rendered manifest) is
/// stable regardless of insertion order.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Labels carried by every resource of an attempt.
    pub fn for_attempt(label: &AttemptLabel) -> Self {
        let mut labels = Self::new();
        labels.insert(LABEL_TRAINING_ATTEMPT, label.as_str());
        labels
    }

    /// Labels carried by worker `index` of an attempt.
    pub fn for_worker(label: &AttemptLabel, index: WorkerIndex) -> Self {
        let mut labels = Self::for_attempt(label);
        labels.insert(LABEL_APP, index.host());
        labels
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert or overwrite a label. Returns `self` for chaining.
    pub fn insert<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// Attempt label value, if this resource belongs to an attempt.
    pub fn attempt(&self) -> Option<&str> {
        self.get(LABEL_TRAINING_ATTEMPT)
    }

    /// `true` only on an exact match of the attempt label value.
    pub fn belongs_to(&self, label: &AttemptLabel) -> bool {
        self.attempt() == Some(label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Labels {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
