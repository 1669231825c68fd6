mod domain;
pub use domain::{
    ATTEMPT_LABEL_MAX_LEN, AttemptLabel, Env, KeyValue, Labels, WORKER_NAME_PREFIX, WorkerIndex,
};
pub use domain::{
    DEFAULT_IMAGE, DEFAULT_NAMESPACE, DEFAULT_PORT, DEFAULT_WORKERS, ENV_TF_CONFIG,
    ENV_TOT_WORKERS, ENV_WORKER_NUMBER, LABEL_APP, LABEL_TRAINING_ATTEMPT, PAYLOAD_HOLDER_NAME,
    PAYLOAD_SCRIPT_KEY,
};

mod error;
pub use error::{ModelError, ModelResult};

mod kind;
pub use kind::ResourceKind;

mod spec;
pub use spec::{ClusterDescriptor, ClusterSpec, Invocation, LaunchSpec, Mode, TaskSpec, TaskType};
