//! Base templates and the renderers that stamp resources out of them.
//!
//! A [`BaseTemplate`] is loaded and validated once per launch and never mutated.
//! Every render works on its own deep copy of the document, so overrides applied
//! for worker `i` can never leak into worker `i + 1`.
mod command;
mod render;
mod resource;

pub use command::{entrypoint_command, shell_command};
pub use render::{payload_holder, render_endpoint, render_payload_holder, render_worker};
pub use resource::RenderedResource;

use std::{fmt, path::Path};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::TemplateError;

/// Which resource a template is the base of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRole {
    /// Worker pod.
    Worker,
    /// Worker service.
    Endpoint,
}

impl TemplateRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateRole::Worker => "worker",
            TemplateRole::Endpoint => "endpoint",
        }
    }
}

impl fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, validated base manifest.
#[derive(Debug, Clone)]
pub struct BaseTemplate {
    role: TemplateRole,
    source: String,
    doc: Value,
}

impl BaseTemplate {
    /// Load a YAML template from disk.
    pub fn from_path(role: TemplateRole, path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: Value = serde_yaml::from_str(&text).map_err(|source| TemplateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let template = Self::from_value(role, path.display().to_string(), doc)?;
        debug!(role = %role, path = %path.display(), "template loaded");
        Ok(template)
    }

    /// Validate an already parsed document.
    ///
    /// `source` only names the template in errors. A missing `metadata.labels`
    /// map is created empty; every other structural field must be present.
    pub fn from_value(
        role: TemplateRole,
        source: impl Into<String>,
        mut doc: Value,
    ) -> Result<Self, TemplateError> {
        let source = source.into();
        let missing = |field: &'static str| TemplateError::Missing {
            template: role.as_str(),
            source_name: source.clone(),
            field,
        };

        let metadata = doc
            .get_mut("metadata")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| missing("metadata"))?;
        let labels = metadata
            .entry("labels")
            .or_insert_with(|| Value::Object(Map::new()));
        if labels.is_null() {
            *labels = Value::Object(Map::new());
        }
        if !labels.is_object() {
            return Err(missing("metadata.labels"));
        }

        match role {
            TemplateRole::Worker => {
                first_item(&doc, "containers").ok_or_else(|| missing("spec.containers[0]"))?;
            }
            TemplateRole::Endpoint => {
                doc.pointer("/spec/selector")
                    .filter(|v| v.is_object())
                    .ok_or_else(|| missing("spec.selector"))?;
                first_item(&doc, "ports").ok_or_else(|| missing("spec.ports[0]"))?;
            }
        }

        Ok(Self { role, source, doc })
    }

    pub fn role(&self) -> TemplateRole {
        self.role
    }

    /// Where the template came from, for diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The untouched base document.
    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// A fresh deep copy to render into.
    pub(crate) fn instantiate(&self, expected: TemplateRole) -> Result<Value, TemplateError> {
        if self.role != expected {
            return Err(TemplateError::WrongRole {
                expected: expected.as_str(),
                actual: self.role.as_str(),
                source_name: self.source.clone(),
            });
        }
        Ok(self.doc.clone())
    }

    pub(crate) fn missing(&self, field: &'static str) -> TemplateError {
        TemplateError::Missing {
            template: self.role.as_str(),
            source_name: self.source.clone(),
            field,
        }
    }
}

/// First element of `spec.<list>` if it is an object.
fn first_item<'a>(doc: &'a Value, list: &str) -> Option<&'a Map<String, Value>> {
    doc.get("spec")?
        .get(list)?
        .as_array()?
        .first()?
        .as_object()
}
