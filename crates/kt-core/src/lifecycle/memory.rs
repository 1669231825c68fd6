//! In-memory control plane that records every call.
//!
//! Behaves like a single namespace: names are unique per kind, listing matches
//! the attempt label exactly, deleting something already gone succeeds.
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use kt_model::{AttemptLabel, Labels, ResourceKind};
use serde_json::Value;

use crate::{
    error::ControlPlaneError,
    lifecycle::{ControlPlane, ResourceHandle},
    template::RenderedResource,
};

/// One call as seen by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlPlaneCall {
    Create { kind: ResourceKind, name: String },
    List { kind: ResourceKind, label: String },
    Delete { kind: ResourceKind, name: String },
}

/// A resource held by [`MemoryControlPlane`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub kind: ResourceKind,
    pub name: String,
    pub uid: String,
    pub labels: Labels,
    pub body: Value,
}

#[derive(Default)]
struct State {
    objects: Vec<StoredObject>,
    calls: Vec<ControlPlaneCall>,
    next_uid: u64,
    creates_left: Option<usize>,
    deletes_left: Option<usize>,
}

impl State {
    fn uid(&mut self) -> String {
        self.next_uid += 1;
        format!("uid-{:04}", self.next_uid)
    }

    fn insert(&mut self, kind: ResourceKind, name: String, labels: Labels, body: Value) -> bool {
        if self.objects.iter().any(|o| o.kind == kind && o.name == name) {
            return false;
        }
        let uid = self.uid();
        self.objects.push(StoredObject {
            kind,
            name,
            uid,
            labels,
            body,
        });
        true
    }
}

/// Recording stand-in for a cluster namespace.
#[derive(Default)]
pub struct MemoryControlPlane {
    state: Mutex<State>,
}

impl MemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Put a pre-existing resource in place without recording a call.
    pub fn seed(&self, kind: ResourceKind, name: impl Into<String>, labels: Labels) {
        self.state().insert(kind, name.into(), labels, Value::Null);
    }

    /// Let `n` more creates succeed, then fail every following one.
    pub fn fail_creates_after(&self, n: usize) {
        self.state().creates_left = Some(n);
    }

    /// Let `n` more deletes succeed, then fail every following one.
    pub fn fail_deletes_after(&self, n: usize) {
        self.state().deletes_left = Some(n);
    }

    pub fn calls(&self) -> Vec<ControlPlaneCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.state().objects.clone()
    }

    /// Stored resources of one kind, in creation order.
    pub fn objects_of(&self, kind: ResourceKind) -> Vec<StoredObject> {
        self.state()
            .objects
            .iter()
            .filter(|o| o.kind == kind)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().objects.is_empty()
    }
}

/// Consumes one unit of an optional budget; `false` once it is spent.
fn take(budget: &mut Option<usize>) -> bool {
    match budget {
        None => true,
        Some(0) => false,
        Some(n) => {
            *n -= 1;
            true
        }
    }
}

#[async_trait]
impl ControlPlane for MemoryControlPlane {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, resource: &RenderedResource) -> Result<(), ControlPlaneError> {
        let mut state = self.state();
        state.calls.push(ControlPlaneCall::Create {
            kind: resource.kind(),
            name: resource.name().to_string(),
        });

        let fail = |reason: &str| ControlPlaneError::Create {
            kind: resource.kind(),
            name: resource.name().to_string(),
            reason: reason.to_string(),
        };
        if !take(&mut state.creates_left) {
            return Err(fail("injected failure"));
        }
        let inserted = state.insert(
            resource.kind(),
            resource.name().to_string(),
            resource.labels().clone(),
            resource.body().clone(),
        );
        if !inserted {
            return Err(fail("already exists"));
        }
        Ok(())
    }

    async fn list_by_label(
        &self,
        kind: ResourceKind,
        label: &AttemptLabel,
    ) -> Result<Vec<ResourceHandle>, ControlPlaneError> {
        let mut state = self.state();
        state.calls.push(ControlPlaneCall::List {
            kind,
            label: label.to_string(),
        });
        Ok(state
            .objects
            .iter()
            .filter(|o| o.kind == kind && o.labels.belongs_to(label))
            .map(|o| ResourceHandle::new(kind, o.name.clone()).with_uid(o.uid.clone()))
            .collect())
    }

    async fn delete(&self, handle: &ResourceHandle) -> Result<(), ControlPlaneError> {
        let mut state = self.state();
        state.calls.push(ControlPlaneCall::Delete {
            kind: handle.kind,
            name: handle.name.clone(),
        });
        if !take(&mut state.deletes_left) {
            return Err(ControlPlaneError::Delete {
                kind: handle.kind,
                name: handle.name.clone(),
                reason: "injected failure".into(),
            });
        }
        state.objects.retain(|o| {
            let same = o.kind == handle.kind && o.name == handle.name;
            let same_uid = handle.uid.as_ref().is_none_or(|uid| *uid == o.uid);
            !(same && same_uid)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::payload_holder;

    #[tokio::test]
    async fn create_rejects_duplicate_names_per_kind() {
        let plane = MemoryControlPlane::new();
        let label: AttemptLabel = "a".parse().unwrap();
        let res = payload_holder("print(1)", &label);

        plane.create(&res).await.unwrap();
        let err = plane.create(&res).await.unwrap_err();
        assert!(matches!(err, ControlPlaneError::Create { .. }));
        assert_eq!(plane.len(), 1);

        plane.seed(ResourceKind::Worker, "script", Labels::new());
        assert_eq!(plane.len(), 2);
    }

    #[tokio::test]
    async fn delete_is_pinned_to_uid() {
        let plane = MemoryControlPlane::new();
        let label: AttemptLabel = "a".parse().unwrap();
        plane.seed(ResourceKind::Worker, "worker0", Labels::for_attempt(&label));

        let stale = ResourceHandle::new(ResourceKind::Worker, "worker0").with_uid("uid-9999");
        plane.delete(&stale).await.unwrap();
        assert_eq!(plane.len(), 1);

        let handles = plane.list_by_label(ResourceKind::Worker, &label).await.unwrap();
        plane.delete(&handles[0]).await.unwrap();
        assert!(plane.is_empty());
    }

    #[tokio::test]
    async fn injected_create_failure_keeps_earlier_objects() {
        let plane = MemoryControlPlane::new();
        plane.fail_creates_after(1);
        let a: AttemptLabel = "a".parse().unwrap();
        let b: AttemptLabel = "b".parse().unwrap();

        plane.create(&payload_holder("1", &a)).await.unwrap();
        assert!(plane.create(&payload_holder("2", &b)).await.is_err());
        assert_eq!(plane.len(), 1);
    }
}
