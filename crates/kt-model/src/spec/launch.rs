use std::path::PathBuf;

use crate::{AttemptLabel, DEFAULT_IMAGE, DEFAULT_PORT, DEFAULT_WORKERS, Env, KeyValue};

/// Default location of the worker base template.
const DEFAULT_POD_TEMPLATE: &str = "templates/pod.yaml";

/// Default location of the endpoint base template.
const DEFAULT_SERVICE_TEMPLATE: &str = "templates/service.yaml";

/// Raw inputs of one invocation, before the mode is decided.
///
/// Mirrors the command line one to one. Nothing here has been checked yet:
/// whether `script` is present, or whether `delete` holds a valid label, is
/// decided when the invocation is resolved into a [`Mode`].
#[derive(Clone, Debug)]
pub struct Invocation {
    /// Payload script; required unless tearing down.
    pub script: Option<PathBuf>,
    /// Attempt to tear down. Switches the invocation to teardown mode.
    pub delete: Option<String>,
    pub workers: u32,
    pub port: u16,
    pub image: String,
    /// Entrypoint script whose lines become the container command.
    pub entrypoint: Option<PathBuf>,
    /// Extra worker env appended after the built-in entries.
    pub env: Vec<KeyValue>,
    pub pod_template: PathBuf,
    pub service_template: PathBuf,
}

impl Default for Invocation {
    fn default() -> Self {
        Self {
            script: None,
            delete: None,
            workers: DEFAULT_WORKERS,
            port: DEFAULT_PORT,
            image: DEFAULT_IMAGE.to_string(),
            entrypoint: None,
            env: Vec::new(),
            pod_template: PathBuf::from(DEFAULT_POD_TEMPLATE),
            service_template: PathBuf::from(DEFAULT_SERVICE_TEMPLATE),
        }
    }
}

/// Everything a launch needs, already checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchSpec {
    pub script: PathBuf,
    pub entrypoint: Option<PathBuf>,
    /// Always greater than zero.
    pub workers: u32,
    pub port: u16,
    pub image: String,
    pub extra_env: Env,
    pub pod_template: PathBuf,
    pub service_template: PathBuf,
}

/// What one invocation does. Chosen once, never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Launch(LaunchSpec),
    Teardown(AttemptLabel),
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Launch(_) => "launch",
            Mode::Teardown(_) => "teardown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let inv = Invocation::default();
        assert_eq!(inv.workers, 8);
        assert_eq!(inv.port, 1999);
        assert_eq!(inv.image, "tensorflow/tensorflow:2.0.0b1-py3");
        assert!(inv.script.is_none());
        assert!(inv.delete.is_none());
        assert_eq!(inv.pod_template, PathBuf::from("templates/pod.yaml"));
        assert_eq!(inv.service_template, PathBuf::from("templates/service.yaml"));
    }
}
