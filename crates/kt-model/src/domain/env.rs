use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Ordered environment of a worker container.
///
/// Order is preserved as inserted so that two renders with the same inputs produce
/// byte-identical manifests. Serialized as a plain array of [`KeyValue`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(Vec<KeyValue>);

impl Env {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Value of the first entry named `name`.
    ///
    /// Kubernetes resolves duplicate names to the first occurrence as well.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|kv| kv.name() == name)
            .map(|kv| kv.value())
    }

    /// Append an entry.
    pub fn push<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(name, value));
    }

    /// Builder-style [`Env::push`].
    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.push(name, value);
        self
    }

    /// Append every entry of `extra` whose name is not already present.
    pub fn extend_missing<'a>(&mut self, extra: impl IntoIterator<Item = &'a KeyValue>) {
        for kv in extra {
            if self.get(kv.name()).is_none() {
                self.0.push(kv.clone());
            }
        }
    }
}

impl FromIterator<KeyValue> for Env {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
