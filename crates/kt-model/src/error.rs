use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid attempt label '{label}': {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    #[error("invalid env entry '{0}' (expected KEY=VALUE)")]
    InvalidKeyValue(String),

    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
