use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Single environment variable as it appears in a container spec.
///
/// Serialized as `{"name": ..., "value": ...}`, the shape of a Kubernetes `EnvVar`
/// without `valueFrom`, so a list of these can be dropped straight into a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    name: String,
    value: String,
}

impl KeyValue {
    pub fn new<K, V>(name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Parses the `KEY=VALUE` form accepted on the command line.
///
/// Only the first `=` splits; the value may itself contain `=` or be empty.
impl FromStr for KeyValue {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => Ok(Self::new(name.trim(), value)),
            _ => Err(ModelError::InvalidKeyValue(s.to_string())),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::KeyValue;

    #[test]
    fn parses_key_value_pair() {
        let kv: KeyValue = "EPOCHS=10".parse().unwrap();
        assert_eq!(kv.name(), "EPOCHS");
        assert_eq!(kv.value(), "10");
    }

    #[test]
    fn splits_on_first_equals_only() {
        let kv: KeyValue = "ARGS=--lr=0.1".parse().unwrap();
        assert_eq!(kv.name(), "ARGS");
        assert_eq!(kv.value(), "--lr=0.1");

        let empty: KeyValue = "EMPTY=".parse().unwrap();
        assert_eq!(empty.value(), "");
    }

    #[test]
    fn rejects_missing_separator_or_name() {
        for bad in ["", "NOVALUE", "=value", "  =x"] {
            assert!(bad.parse::<KeyValue>().is_err(), "expected error for {bad:?}");
        }
    }

    #[test]
    fn serializes_as_container_env_entry() {
        let kv = KeyValue::new("TOT_WORKERS", "3");
        let json = serde_json::to_value(&kv).unwrap();
        assert_eq!(json, serde_json::json!({"name": "TOT_WORKERS", "value": "3"}));
    }

    #[test]
    fn display_is_cli_form() {
        assert_eq!(KeyValue::new("A", "b").to_string(), "A=b");
    }
}
