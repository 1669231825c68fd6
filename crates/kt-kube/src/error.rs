use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KubeError {
    #[error("invalid cluster configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read kubeconfig {path}: {reason}")]
    Kubeconfig { path: PathBuf, reason: String },

    #[error("failed to infer cluster configuration: {0}")]
    Infer(String),

    #[error("failed to build cluster client: {0}")]
    Client(String),
}
