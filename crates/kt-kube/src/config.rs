use std::path::PathBuf;

use kt_model::DEFAULT_NAMESPACE;

use crate::error::KubeError;

/// Where and how to talk to the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeConfig {
    /// Namespace every resource is created in, listed from and deleted from.
    pub namespace: String,
    /// Explicit kubeconfig file; inferred when `None`.
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context; the current one when `None`.
    pub context: Option<String>,
    /// Send every write as a server-side dry run.
    pub dry_run: bool,
}

impl Default for KubeConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            kubeconfig: None,
            context: None,
            dry_run: false,
        }
    }
}

impl KubeConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn validate(&self) -> Result<(), KubeError> {
        if self.namespace.trim().is_empty() {
            return Err(KubeError::InvalidConfig("namespace must not be empty".into()));
        }
        if self.context.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(KubeError::InvalidConfig("context must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_default_namespace() {
        let cfg = KubeConfig::default();
        assert_eq!(cfg.namespace, "default");
        assert!(!cfg.dry_run);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_blank_namespace_and_context() {
        assert!(KubeConfig::default().with_namespace(" ").validate().is_err());

        let cfg = KubeConfig {
            context: Some(String::new()),
            ..KubeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(KubeError::InvalidConfig(_))));
    }
}
