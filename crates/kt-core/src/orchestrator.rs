//! Top-level launch / teardown coordination.
//!
//! One invocation runs exactly one [`Mode`]. Every control-plane call is awaited
//! before the next one is issued; the first error stops the sequence and nothing
//! is rolled back.
use std::sync::Arc;

use kt_model::{
    AttemptLabel, ENV_TF_CONFIG, ENV_TOT_WORKERS, ENV_WORKER_NUMBER, Env, Invocation,
    LABEL_TRAINING_ATTEMPT, LaunchSpec, Mode, WorkerIndex,
};
use tracing::{info, instrument, warn};

use crate::{
    descriptor::ClusterDescriptorBuilder,
    error::CoreError,
    lifecycle::{ControlPlane, ResourceLifecycleManager, TeardownReport},
    naming::NameGenerator,
    template::{
        BaseTemplate, RenderedResource, TemplateRole, entrypoint_command, render_endpoint,
        render_payload_holder, render_worker,
    },
};

/// Decide what an invocation does.
///
/// Fails with [`CoreError::Configuration`] when a launch has no payload script,
/// when teardown is combined with a script, when zero workers are requested or
/// when the teardown label is not a valid label value.
pub fn resolve_mode(inv: Invocation) -> Result<Mode, CoreError> {
    match (inv.delete, inv.script) {
        (Some(_), Some(script)) => Err(CoreError::Configuration(format!(
            "--delete cannot be combined with a payload script ({})",
            script.display()
        ))),
        (Some(label), None) => label
            .parse::<AttemptLabel>()
            .map(Mode::Teardown)
            .map_err(|e| CoreError::Configuration(e.to_string())),
        (None, None) => Err(CoreError::Configuration("no script specified".into())),
        (None, Some(_)) if inv.workers == 0 => Err(CoreError::Configuration(
            "at least one worker is required".into(),
        )),
        (None, Some(script)) => Ok(Mode::Launch(LaunchSpec {
            script,
            entrypoint: inv.entrypoint,
            workers: inv.workers,
            port: inv.port,
            image: inv.image,
            extra_env: inv.env.into_iter().collect(),
            pod_template: inv.pod_template,
            service_template: inv.service_template,
        })),
    }
}

/// What a successful launch created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub label: AttemptLabel,
    pub workers: u32,
    pub endpoints: u32,
}

impl LaunchReport {
    /// Resources created, payload holder included.
    pub fn total(&self) -> usize {
        1 + self.workers as usize + self.endpoints as usize
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Launched(LaunchReport),
    TornDown(AttemptLabel, TeardownReport),
}

/// Runs launches and teardowns against one control plane.
#[derive(Debug, Clone)]
pub struct LaunchOrchestrator {
    lifecycle: ResourceLifecycleManager,
    names: NameGenerator,
}

impl LaunchOrchestrator {
    pub fn new(plane: Arc<dyn ControlPlane>) -> Self {
        Self {
            lifecycle: ResourceLifecycleManager::new(plane),
            names: NameGenerator::new(),
        }
    }

    pub fn lifecycle(&self) -> &ResourceLifecycleManager {
        &self.lifecycle
    }

    /// Resolve the invocation and run the chosen mode.
    ///
    /// Configuration errors surface before any template is read or any
    /// control-plane call is made.
    pub async fn run(&self, inv: Invocation) -> Result<Outcome, CoreError> {
        let mode = resolve_mode(inv)?;
        info!(mode = mode.as_str(), "invocation resolved");
        self.run_mode(mode).await
    }

    pub async fn run_mode(&self, mode: Mode) -> Result<Outcome, CoreError> {
        match mode {
            Mode::Launch(spec) => self.launch(&spec).await.map(Outcome::Launched),
            Mode::Teardown(label) => {
                let report = self.teardown(&label).await?;
                Ok(Outcome::TornDown(label, report))
            }
        }
    }

    /// Payload holder, then every worker, then every endpoint.
    ///
    /// Templates, the entrypoint and the payload script are read before the first
    /// create, so their errors never leave a partial attempt behind. Later failures are wrapped in
    /// [`CoreError::LaunchAborted`] carrying the label needed for cleanup.
    #[instrument(level = "info", skip_all, fields(workers = spec.workers, port = spec.port))]
    pub async fn launch(&self, spec: &LaunchSpec) -> Result<LaunchReport, CoreError> {
        let pods = BaseTemplate::from_path(TemplateRole::Worker, &spec.pod_template)?;
        let services = BaseTemplate::from_path(TemplateRole::Endpoint, &spec.service_template)?;
        let command = spec
            .entrypoint
            .as_deref()
            .map(entrypoint_command)
            .transpose()?;
        let descriptors = ClusterDescriptorBuilder::new(spec.workers, spec.port);

        let label = self.names.generate();
        let holder = render_payload_holder(&spec.script, &label)?;
        info!("generating with label {LABEL_TRAINING_ATTEMPT}={label}");

        let mut report = LaunchReport {
            label: label.clone(),
            workers: 0,
            endpoints: 0,
        };
        let mut created = 0usize;

        let steps = async {
            self.submit(&holder, &mut created).await?;

            for idx in WorkerIndex::all(spec.workers) {
                let env = worker_env(&descriptors, idx, &spec.extra_env)?;
                let pod =
                    render_worker(&pods, idx, &label, &spec.image, &env, command.as_deref())?;
                self.submit(&pod, &mut created).await?;
                report.workers += 1;
            }

            for idx in WorkerIndex::all(spec.workers) {
                let svc = render_endpoint(&services, idx, &label, spec.port)?;
                self.submit(&svc, &mut created).await?;
                report.endpoints += 1;
            }
            Ok::<(), CoreError>(())
        };

        if let Err(e) = steps.await {
            warn!(
                label = %label,
                created,
                "launch aborted; created resources stay live until torn down"
            );
            return Err(CoreError::LaunchAborted {
                label,
                created,
                source: Box::new(e),
            });
        }

        info!(label = %label, resources = report.total(), "attempt launched");
        Ok(report)
    }

    /// Remove every resource of the attempt `label`.
    #[instrument(level = "info", skip_all, fields(label = %label))]
    pub async fn teardown(&self, label: &AttemptLabel) -> Result<TeardownReport, CoreError> {
        let report = self.lifecycle.teardown(label).await?;
        info!(deleted = report.total(), "attempt torn down: {report}");
        Ok(report)
    }

    async fn submit(
        &self,
        resource: &RenderedResource,
        created: &mut usize,
    ) -> Result<(), CoreError> {
        self.lifecycle.create(resource).await?;
        *created += 1;
        Ok(())
    }
}

/// `TF_CONFIG`, `WORKER_NUMBER`, `TOT_WORKERS`, then any extra entry whose name
/// is not one of those.
fn worker_env(
    descriptors: &ClusterDescriptorBuilder,
    index: WorkerIndex,
    extra: &Env,
) -> Result<Env, CoreError> {
    let tf_config = descriptors.descriptor(index).to_json()?;
    let mut env = Env::new()
        .with(ENV_TF_CONFIG, tf_config)
        .with(ENV_WORKER_NUMBER, index.to_string())
        .with(ENV_TOT_WORKERS, descriptors.total_workers().to_string());
    env.extend_missing(extra.iter());
    Ok(env)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use kt_model::{ClusterDescriptor, KeyValue, ResourceKind};
    use serde_json::Value;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        error::ControlPlaneError,
        lifecycle::memory::{ControlPlaneCall, MemoryControlPlane},
    };

    const POD: &str = r#"
apiVersion: v1
kind: Pod
metadata:
  name: placeholder
  labels:
    team: ml
spec:
  containers:
    - name: tensorflow
      image: placeholder
      command: ["python", "/script/training-script.py"]
      ports:
        - containerPort: 1999
"#;

    const SERVICE: &str = r#"
apiVersion: v1
kind: Service
metadata:
  name: placeholder
spec:
  selector:
    app: placeholder
  ports:
    - port: 1999
      targetPort: 1999
"#;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("pod.yaml"), POD).unwrap();
            fs::write(dir.path().join("service.yaml"), SERVICE).unwrap();
            fs::write(dir.path().join("train.py"), "print('hello')\n").unwrap();
            Self { dir }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn invocation(&self, workers: u32) -> Invocation {
            Invocation {
                script: Some(self.path("train.py")),
                workers,
                pod_template: self.path("pod.yaml"),
                service_template: self.path("service.yaml"),
                ..Invocation::default()
            }
        }
    }

    fn orchestrator() -> (Arc<MemoryControlPlane>, LaunchOrchestrator) {
        let plane = Arc::new(MemoryControlPlane::new());
        let orch = LaunchOrchestrator::new(plane.clone());
        (plane, orch)
    }

    fn launched(outcome: Outcome) -> LaunchReport {
        match outcome {
            Outcome::Launched(report) => report,
            other => panic!("expected a launch, got {other:?}"),
        }
    }

    fn env_of(body: &Value) -> Vec<(String, String)> {
        body.pointer("/spec/containers/0/env")
            .and_then(Value::as_array)
            .unwrap()
            .iter()
            .map(|e| {
                (
                    e["name"].as_str().unwrap().to_string(),
                    e["value"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }

    fn created_names(plane: &MemoryControlPlane) -> Vec<(ResourceKind, String)> {
        plane
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                ControlPlaneCall::Create { kind, name } => Some((kind, name)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn resolve_requires_a_script_to_launch() {
        let err = resolve_mode(Invocation::default()).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(ref m) if m == "no script specified"));
    }

    #[test]
    fn resolve_rejects_delete_with_script() {
        let inv = Invocation {
            script: Some("train.py".into()),
            delete: Some("brave_hopper_00aa11".into()),
            ..Invocation::default()
        };
        assert!(matches!(resolve_mode(inv), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn resolve_rejects_bad_labels_and_zero_workers() {
        let inv = Invocation {
            delete: Some("not a label!".into()),
            ..Invocation::default()
        };
        assert!(matches!(resolve_mode(inv), Err(CoreError::Configuration(_))));

        let inv = Invocation {
            script: Some("train.py".into()),
            workers: 0,
            ..Invocation::default()
        };
        assert!(matches!(resolve_mode(inv), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn resolve_picks_teardown_and_launch() {
        let inv = Invocation {
            delete: Some("brave_hopper_00aa11".into()),
            ..Invocation::default()
        };
        match resolve_mode(inv).unwrap() {
            Mode::Teardown(label) => assert_eq!(label.as_str(), "brave_hopper_00aa11"),
            other => panic!("unexpected {other:?}"),
        }

        let inv = Invocation {
            script: Some("train.py".into()),
            env: vec![KeyValue::new("A", "1")],
            ..Invocation::default()
        };
        match resolve_mode(inv).unwrap() {
            Mode::Launch(spec) => {
                assert_eq!(spec.workers, kt_model::DEFAULT_WORKERS);
                assert_eq!(spec.extra_env.get("A"), Some("1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_script_makes_no_calls() {
        let (plane, orch) = orchestrator();
        let err = orch.run(Invocation::default()).await.unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
        assert!(plane.calls().is_empty());
    }

    #[tokio::test]
    async fn launch_creates_holder_then_workers_then_endpoints() {
        let fx = Fixture::new();
        let (plane, orch) = orchestrator();

        let report = launched(orch.run(fx.invocation(3)).await.unwrap());
        assert_eq!(report.workers, 3);
        assert_eq!(report.endpoints, 3);
        assert_eq!(report.total(), 7);

        let expected: Vec<(ResourceKind, String)> = std::iter::once((
            ResourceKind::PayloadHolder,
            "script".to_string(),
        ))
        .chain((0..3).map(|i| (ResourceKind::Worker, format!("worker{i}"))))
        .chain((0..3).map(|i| (ResourceKind::Endpoint, format!("worker{i}"))))
        .collect();
        assert_eq!(created_names(&plane), expected);

        for obj in plane.objects() {
            assert!(obj.labels.belongs_to(&report.label), "{} unlabelled", obj.name);
        }
    }

    #[tokio::test]
    async fn workers_carry_cluster_descriptor_env() {
        let fx = Fixture::new();
        let (plane, orch) = orchestrator();
        let mut inv = fx.invocation(3);
        inv.env = vec![KeyValue::new("EXTRA", "yes"), KeyValue::new("TOT_WORKERS", "99")];

        launched(orch.run(inv).await.unwrap());

        for (i, pod) in plane.objects_of(ResourceKind::Worker).iter().enumerate() {
            let env = env_of(&pod.body);
            let names: Vec<&str> = env.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, ["TF_CONFIG", "WORKER_NUMBER", "TOT_WORKERS", "EXTRA"]);
            assert_eq!(env[1].1, i.to_string());
            assert_eq!(env[2].1, "3");

            let desc = ClusterDescriptor::from_json(&env[0].1).unwrap();
            assert_eq!(
                desc.peers(),
                ["worker0:1999", "worker1:1999", "worker2:1999"]
            );
            assert_eq!(desc.index().get(), i as u32);
        }
    }

    #[tokio::test]
    async fn endpoints_select_their_worker() {
        let fx = Fixture::new();
        let (plane, orch) = orchestrator();
        let mut inv = fx.invocation(2);
        inv.port = 2222;

        launched(orch.run(inv).await.unwrap());

        for (i, svc) in plane.objects_of(ResourceKind::Endpoint).iter().enumerate() {
            assert_eq!(svc.body["spec"]["selector"]["app"], format!("worker{i}"));
            assert_eq!(svc.body["spec"]["ports"][0]["port"], 2222);
        }
    }

    #[tokio::test]
    async fn entrypoint_replaces_container_command() {
        let fx = Fixture::new();
        fs::write(fx.path("entry.sh"), "pip install x\n\npython /script/training-script.py\n")
            .unwrap();
        let (plane, orch) = orchestrator();
        let mut inv = fx.invocation(1);
        inv.entrypoint = Some(fx.path("entry.sh"));

        launched(orch.run(inv).await.unwrap());

        let pod = &plane.objects_of(ResourceKind::Worker)[0];
        assert_eq!(
            pod.body["spec"]["containers"][0]["command"],
            serde_json::json!([
                "/bin/bash",
                "-c",
                "pip install x && python /script/training-script.py"
            ])
        );
    }

    #[tokio::test]
    async fn unreadable_inputs_fail_before_any_create() {
        let fx = Fixture::new();
        let (plane, orch) = orchestrator();

        let mut inv = fx.invocation(2);
        inv.pod_template = fx.path("missing.yaml");
        assert!(matches!(
            orch.run(inv).await,
            Err(CoreError::Template(_))
        ));

        let mut inv = fx.invocation(2);
        inv.script = Some(fx.path("missing.py"));
        assert!(matches!(
            orch.run(inv).await,
            Err(CoreError::Read { what: "payload script", .. })
        ));

        let mut inv = fx.invocation(2);
        inv.entrypoint = Some(fx.path("missing.sh"));
        assert!(matches!(
            orch.run(inv).await,
            Err(CoreError::Read { what: "entrypoint", .. })
        ));

        assert!(plane.calls().is_empty());
    }

    #[tokio::test]
    async fn create_failure_stops_and_reports_label() {
        let fx = Fixture::new();
        let (plane, orch) = orchestrator();
        plane.fail_creates_after(3);

        let err = orch.run(fx.invocation(3)).await.unwrap_err();
        let CoreError::LaunchAborted { label, created, source } = err else {
            panic!("expected an aborted launch");
        };
        assert_eq!(created, 3);
        assert!(matches!(
            *source,
            CoreError::ControlPlane(ControlPlaneError::Create { .. })
        ));
        assert_eq!(plane.calls().len(), 4);
        assert_eq!(plane.len(), 3);

        // The partial attempt stays until torn down by its label.
        let report = orch.teardown(&label).await.unwrap();
        assert_eq!(report.total(), 3);
        assert!(plane.is_empty());
    }

    #[tokio::test]
    async fn launch_then_teardown_leaves_nothing() {
        let fx = Fixture::new();
        let (plane, orch) = orchestrator();

        let report = launched(orch.run(fx.invocation(3)).await.unwrap());
        plane.clear_calls();

        let inv = Invocation {
            delete: Some(report.label.to_string()),
            ..Invocation::default()
        };
        let Outcome::TornDown(label, teardown) = orch.run(inv).await.unwrap() else {
            panic!("expected a teardown");
        };
        assert_eq!(label, report.label);
        assert_eq!(teardown.payload_holders, 1);
        assert_eq!(teardown.workers, 3);
        assert_eq!(teardown.endpoints, 3);
        assert!(plane.is_empty());

        let deletes = plane
            .calls()
            .iter()
            .filter(|c| matches!(c, ControlPlaneCall::Delete { .. }))
            .count();
        assert_eq!(deletes, 7);
    }

    #[tokio::test]
    async fn shipped_templates_launch() {
        let fx = Fixture::new();
        let shipped = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates");
        let (plane, orch) = orchestrator();
        let mut inv = fx.invocation(2);
        inv.pod_template = shipped.join("pod.yaml");
        inv.service_template = shipped.join("service.yaml");

        launched(orch.run(inv).await.unwrap());
        assert_eq!(plane.len(), 5);

        let pod = &plane.objects_of(ResourceKind::Worker)[1];
        assert_eq!(pod.body["metadata"]["labels"]["app"], "worker1");
        assert_eq!(pod.body["spec"]["volumes"][0]["configMap"]["name"], "script");
    }

    #[tokio::test]
    async fn bundled_demo_launches_with_shipped_templates() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
        let (plane, orch) = orchestrator();
        let inv = Invocation {
            script: Some(root.join("demos/mnist.py")),
            entrypoint: Some(root.join("demos/entrypoint.sh")),
            workers: 2,
            pod_template: root.join("templates/pod.yaml"),
            service_template: root.join("templates/service.yaml"),
            ..Invocation::default()
        };

        launched(orch.run(inv).await.unwrap());

        let holder = &plane.objects_of(ResourceKind::PayloadHolder)[0];
        let script = holder.body["data"]["training-script.py"].as_str().unwrap();
        assert!(script.contains("MultiWorkerMirroredStrategy"));

        let pod = &plane.objects_of(ResourceKind::Worker)[0];
        assert_eq!(
            pod.body["spec"]["containers"][0]["command"][2],
            "pip install --quiet tensorflow-datasets && python /script/training-script.py"
        );
    }

    #[tokio::test]
    async fn teardown_of_unknown_label_is_a_no_op() {
        let (plane, orch) = orchestrator();
        let label: AttemptLabel = "quiet_lovelace_abcdef".parse().unwrap();
        let report = orch.teardown(&label).await.unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(plane.calls().len(), 3);
    }
}
