use std::path::PathBuf;

use kt_model::{AttemptLabel, ModelError, ResourceKind};
use thiserror::Error;

/// Malformed or unreadable base template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("cannot read template '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse template '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{template} template '{source_name}': missing or malformed field `{field}`")]
    Missing {
        template: &'static str,
        source_name: String,
        field: &'static str,
    },

    #[error("{actual} template '{source_name}' used to render a {expected} resource")]
    WrongRole {
        expected: &'static str,
        actual: &'static str,
        source_name: String,
    },
}

/// Failure reported by the control plane. Never retried.
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("failed to create {kind} '{name}': {reason}")]
    Create {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    #[error("failed to list {kind} resources with selector '{selector}': {reason}")]
    List {
        kind: ResourceKind,
        selector: String,
        reason: String,
    },

    #[error("failed to delete {kind} '{name}': {reason}")]
    Delete {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    #[error("cannot encode {kind} '{name}' for the API: {reason}")]
    Encode {
        kind: ResourceKind,
        name: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot read {what} '{path}'")]
    Read {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// A launch stopped part way. Resources created so far stay live until a
    /// teardown with `label` removes them.
    #[error("launch of attempt '{label}' aborted after {created} resource(s) were created")]
    LaunchAborted {
        label: AttemptLabel,
        created: usize,
        #[source]
        source: Box<CoreError>,
    },
}
