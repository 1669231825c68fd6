use std::collections::BTreeMap;

use kt_model::{Labels, ResourceKind};
use serde_json::Value;

/// A fully rendered manifest, ready to submit.
///
/// `name` and `labels` are read back from the rendered body, so they always
/// agree with what the control plane will see.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResource {
    kind: ResourceKind,
    name: String,
    labels: Labels,
    body: Value,
}

impl RenderedResource {
    pub(crate) fn from_body(kind: ResourceKind, body: Value) -> Self {
        let name = body
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let labels = body
            .pointer("/metadata/labels")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect::<BTreeMap<_, _>>()
            })
            .map(Labels::from)
            .unwrap_or_default();

        Self {
            kind,
            name,
            labels,
            body,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}
