use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::debug;

use crate::{config::KubeConfig, error::KubeError};

/// Build a client from an explicit kubeconfig, or infer one (env `KUBECONFIG`,
/// `~/.kube/config`, then in-cluster service account).
pub async fn connect(cfg: &KubeConfig) -> Result<Client, KubeError> {
    cfg.validate()?;

    let options = KubeConfigOptions {
        context: cfg.context.clone(),
        cluster: None,
        user: None,
    };

    let config = match (&cfg.kubeconfig, &cfg.context) {
        (Some(path), _) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| KubeError::Kubeconfig {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| KubeError::Kubeconfig {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
        }
        (None, Some(_)) => Config::from_kubeconfig(&options)
            .await
            .map_err(|e| KubeError::Infer(e.to_string()))?,
        (None, None) => Config::infer()
            .await
            .map_err(|e| KubeError::Infer(e.to_string()))?,
    };

    debug!(
        cluster = %config.cluster_url,
        context = ?cfg.context,
        namespace = %cfg.namespace,
        "cluster config resolved"
    );
    Client::try_from(config).map_err(|e| KubeError::Client(e.to_string()))
}
