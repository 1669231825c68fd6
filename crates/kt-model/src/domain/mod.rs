mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod labels;
pub use labels::Labels;

mod attempt;
pub use attempt::{ATTEMPT_LABEL_MAX_LEN, AttemptLabel};

mod worker;
pub use worker::{WORKER_NAME_PREFIX, WorkerIndex};

mod constants;
pub use constants::{
    DEFAULT_IMAGE, DEFAULT_NAMESPACE, DEFAULT_PORT, DEFAULT_WORKERS, ENV_TF_CONFIG,
    ENV_TOT_WORKERS, ENV_WORKER_NUMBER, LABEL_APP, LABEL_TRAINING_ATTEMPT, PAYLOAD_HOLDER_NAME,
    PAYLOAD_SCRIPT_KEY,
};
