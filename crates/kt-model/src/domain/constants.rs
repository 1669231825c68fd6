//! Well-known keys and defaults shared by every crate in the workspace.
//!
//! The label and env keys are part of the contract with the cluster and with the
//! training script running inside each worker, so they live in one place.

/// Label key carrying the [`crate::AttemptLabel`] on every resource of an attempt.
///
/// Teardown selects with `training_attempt=<label>` and nothing else.
pub const LABEL_TRAINING_ATTEMPT: &str = "training_attempt";

/// Label key the endpoint selector matches against (`app=worker{index}`).
pub const LABEL_APP: &str = "app";

/// Env var holding the serialized [`crate::ClusterDescriptor`].
pub const ENV_TF_CONFIG: &str = "TF_CONFIG";

/// Env var holding the worker's own index.
pub const ENV_WORKER_NUMBER: &str = "WORKER_NUMBER";

/// Env var holding the total number of workers in the attempt.
pub const ENV_TOT_WORKERS: &str = "TOT_WORKERS";

/// Name of the config map that carries the payload script.
pub const PAYLOAD_HOLDER_NAME: &str = "script";

/// Data key under which the payload script text is stored.
pub const PAYLOAD_SCRIPT_KEY: &str = "training-script.py";

pub const DEFAULT_WORKERS: u32 = 8;
pub const DEFAULT_PORT: u16 = 1999;
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_IMAGE: &str = "tensorflow/tensorflow:2.0.0b1-py3";
