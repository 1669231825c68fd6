//! Resource lifecycle over a control plane.
//!
//! [`ControlPlane`] is the seam to the cluster: one awaited round-trip per call,
//! no retries, no readiness polling. [`ResourceLifecycleManager`] builds the
//! attempt-level operations on top of it and scopes every list and delete by the
//! caller's [`AttemptLabel`].
#[cfg(any(test, feature = "testkit"))]
pub mod memory;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use kt_model::{AttemptLabel, ResourceKind};
use tracing::{debug, info, instrument};

use crate::{
    error::{ControlPlaneError, CoreError},
    template::RenderedResource,
};

/// A listed resource, enough to delete exactly that object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    pub name: String,
    /// Server-assigned identity; when present, deletion is pinned to it.
    pub uid: Option<String>,
}

impl ResourceHandle {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            uid: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Cluster API used by the launcher.
///
/// Implementations are bound to one namespace. They must never return or touch
/// objects whose attempt label differs from the one asked for.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Backend name used in logs.
    fn name(&self) -> &'static str;

    /// Submit one resource.
    async fn create(&self, resource: &RenderedResource) -> Result<(), ControlPlaneError>;

    /// Every resource of `kind` whose attempt label equals `label`. One pass.
    async fn list_by_label(
        &self,
        kind: ResourceKind,
        label: &AttemptLabel,
    ) -> Result<Vec<ResourceHandle>, ControlPlaneError>;

    /// Delete one listed resource. A resource already gone is not an error.
    async fn delete(&self, handle: &ResourceHandle) -> Result<(), ControlPlaneError>;
}

/// Counts of resources deleted by one teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub payload_holders: usize,
    pub workers: usize,
    pub endpoints: usize,
}

impl TeardownReport {
    pub fn total(&self) -> usize {
        self.payload_holders + self.workers + self.endpoints
    }

    fn record(&mut self, kind: ResourceKind, count: usize) {
        match kind {
            ResourceKind::PayloadHolder => self.payload_holders += count,
            ResourceKind::Worker => self.workers += count,
            ResourceKind::Endpoint => self.endpoints += count,
        }
    }
}

impl fmt::Display for TeardownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} payload holder(s), {} worker(s), {} endpoint(s)",
            self.payload_holders, self.workers, self.endpoints
        )
    }
}

/// Creates resources and sweeps whole attempts.
#[derive(Clone)]
pub struct ResourceLifecycleManager {
    plane: Arc<dyn ControlPlane>,
}

impl ResourceLifecycleManager {
    pub fn new(plane: Arc<dyn ControlPlane>) -> Self {
        Self { plane }
    }

    pub fn control_plane(&self) -> &Arc<dyn ControlPlane> {
        &self.plane
    }

    /// Submit one rendered resource. Errors are returned as-is.
    pub async fn create(&self, resource: &RenderedResource) -> Result<(), ControlPlaneError> {
        debug!(kind = %resource.kind(), name = resource.name(), "creating resource");
        self.plane.create(resource).await?;
        info!(kind = %resource.kind(), name = resource.name(), "resource created");
        Ok(())
    }

    pub async fn list_by_label(
        &self,
        kind: ResourceKind,
        label: &AttemptLabel,
    ) -> Result<Vec<ResourceHandle>, ControlPlaneError> {
        self.plane.list_by_label(kind, label).await
    }

    pub async fn delete(&self, handle: &ResourceHandle) -> Result<(), ControlPlaneError> {
        self.plane.delete(handle).await
    }

    /// Delete every resource carrying `label`, kind by kind.
    ///
    /// No verification pass follows; a second call for the same label finds
    /// nothing and reports zero deletions.
    #[instrument(level = "debug", skip(self, label), fields(label = %label, backend = self.plane.name()))]
    pub async fn teardown(&self, label: &AttemptLabel) -> Result<TeardownReport, CoreError> {
        let mut report = TeardownReport::default();

        for kind in ResourceKind::ALL {
            let handles = self.plane.list_by_label(kind, label).await?;
            debug!(kind = %kind, found = handles.len(), "listed resources");

            for handle in &handles {
                self.plane.delete(handle).await?;
                info!(kind = %kind, name = %handle.name, "resource deleted");
            }
            report.record(kind, handles.len());
        }
        Ok(report)
    }
}

impl fmt::Debug for ResourceLifecycleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLifecycleManager")
            .field("backend", &self.plane.name())
            .finish()
    }
}
