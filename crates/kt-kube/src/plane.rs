use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::{
    NamespaceResourceScope,
    api::core::v1::{ConfigMap, Pod, Service},
};
use kube::{
    Api, Client, Resource, ResourceExt,
    api::{DeleteParams, ListParams, PostParams, Preconditions},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, trace};

use kt_core::{ControlPlane, ControlPlaneError, RenderedResource, ResourceHandle};
use kt_model::{AttemptLabel, ResourceKind};

use crate::config::KubeConfig;

/// [`ControlPlane`] over the Kubernetes API, bound to one namespace.
#[derive(Clone)]
pub struct KubeControlPlane {
    client: Client,
    namespace: String,
    dry_run: bool,
}

impl KubeControlPlane {
    pub fn new(client: Client, cfg: &KubeConfig) -> Self {
        Self {
            client,
            namespace: cfg.namespace.clone(),
            dry_run: cfg.dry_run,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn api<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    async fn create_as<K>(&self, resource: &RenderedResource) -> Result<(), ControlPlaneError>
    where
        K: Resource<Scope = NamespaceResourceScope>
            + Clone
            + Debug
            + Serialize
            + DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        let object: K = decode(resource)?;
        self.api::<K>()
            .create(&post_params(self.dry_run), &object)
            .await
            .map_err(|e| ControlPlaneError::Create {
                kind: resource.kind(),
                name: resource.name().to_string(),
                reason: describe(&e),
            })?;
        trace!(
            kind = %resource.kind(),
            name = resource.name(),
            namespace = %self.namespace,
            dry_run = self.dry_run,
            "object accepted"
        );
        Ok(())
    }

    async fn list_as<K>(
        &self,
        kind: ResourceKind,
        label: &AttemptLabel,
    ) -> Result<Vec<ResourceHandle>, ControlPlaneError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        let selector = label.selector();
        let list = self
            .api::<K>()
            .list(&ListParams::default().labels(&selector))
            .await
            .map_err(|e| ControlPlaneError::List {
                kind,
                selector: selector.clone(),
                reason: describe(&e),
            })?;
        Ok(list.items.iter().map(|obj| handle_of(kind, obj)).collect())
    }

    async fn delete_as<K>(&self, handle: &ResourceHandle) -> Result<(), ControlPlaneError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        match self
            .api::<K>()
            .delete(&handle.name, &delete_params(handle, self.dry_run))
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_gone(&e) => {
                debug!(resource = %handle, "already gone");
                Ok(())
            }
            Err(e) => Err(ControlPlaneError::Delete {
                kind: handle.kind,
                name: handle.name.clone(),
                reason: describe(&e),
            }),
        }
    }
}

#[async_trait]
impl ControlPlane for KubeControlPlane {
    fn name(&self) -> &'static str {
        "kubernetes"
    }

    async fn create(&self, resource: &RenderedResource) -> Result<(), ControlPlaneError> {
        match resource.kind() {
            ResourceKind::PayloadHolder => self.create_as::<ConfigMap>(resource).await,
            ResourceKind::Worker => self.create_as::<Pod>(resource).await,
            ResourceKind::Endpoint => self.create_as::<Service>(resource).await,
        }
    }

    async fn list_by_label(
        &self,
        kind: ResourceKind,
        label: &AttemptLabel,
    ) -> Result<Vec<ResourceHandle>, ControlPlaneError> {
        match kind {
            ResourceKind::PayloadHolder => self.list_as::<ConfigMap>(kind, label).await,
            ResourceKind::Worker => self.list_as::<Pod>(kind, label).await,
            ResourceKind::Endpoint => self.list_as::<Service>(kind, label).await,
        }
    }

    async fn delete(&self, handle: &ResourceHandle) -> Result<(), ControlPlaneError> {
        match handle.kind {
            ResourceKind::PayloadHolder => self.delete_as::<ConfigMap>(handle).await,
            ResourceKind::Worker => self.delete_as::<Pod>(handle).await,
            ResourceKind::Endpoint => self.delete_as::<Service>(handle).await,
        }
    }
}

impl std::fmt::Debug for KubeControlPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeControlPlane")
            .field("namespace", &self.namespace)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Typed object from a rendered body. The body's `kind` must be the API kind
/// backing the resource.
fn decode<K: DeserializeOwned>(resource: &RenderedResource) -> Result<K, ControlPlaneError> {
    let encode = |reason: String| ControlPlaneError::Encode {
        kind: resource.kind(),
        name: resource.name().to_string(),
        reason,
    };
    let expected = resource.kind().api_kind();
    match resource.body().get("kind").and_then(|k| k.as_str()) {
        Some(actual) if actual == expected => {}
        actual => {
            return Err(encode(format!(
                "expected kind {expected}, found {}",
                actual.unwrap_or("none")
            )));
        }
    }
    serde_json::from_value(resource.body().clone()).map_err(|e| encode(e.to_string()))
}

fn handle_of<K: Resource>(kind: ResourceKind, obj: &K) -> ResourceHandle {
    let handle = ResourceHandle::new(kind, obj.name_any());
    match obj.uid() {
        Some(uid) => handle.with_uid(uid),
        None => handle,
    }
}

fn post_params(dry_run: bool) -> PostParams {
    PostParams {
        dry_run,
        ..PostParams::default()
    }
}

/// Deletion pinned to the listed object's UID, so a same-named replacement
/// created after listing is left alone.
fn delete_params(handle: &ResourceHandle, dry_run: bool) -> DeleteParams {
    DeleteParams {
        dry_run,
        preconditions: handle.uid.as_ref().map(|uid| Preconditions {
            uid: Some(uid.clone()),
            resource_version: None,
        }),
        ..DeleteParams::default()
    }
}

/// 404: deleted already. 409 on a pinned delete: the listed object was replaced,
/// so it is gone as well.
fn is_gone(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404 || ae.code == 409)
}

fn describe(err: &kube::Error) -> String {
    match err {
        kube::Error::Api(ae) => format!("{} ({} {})", ae.message, ae.code, ae.reason),
        other => other.to_string(),
    }
}
