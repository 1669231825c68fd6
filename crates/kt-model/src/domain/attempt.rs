use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{LABEL_TRAINING_ATTEMPT, ModelError};

/// Longest value Kubernetes accepts for a label.
pub const ATTEMPT_LABEL_MAX_LEN: usize = 63;

/// Identifier shared by every resource of one training attempt.
///
/// The value is stored under the `training_attempt` label and is the only key
/// teardown selects on, so it is validated as a Kubernetes label value on
/// construction: at most 63 characters, alphanumeric at both ends, and only
/// `-`, `_` or `.` in between.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttemptLabel(String);

impl AttemptLabel {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        Self::try_from(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Equality label selector matching exactly this attempt:
    /// `training_attempt=<label>`.
    pub fn selector(&self) -> String {
        format!("{LABEL_TRAINING_ATTEMPT}={}", self.0)
    }
}

fn validate(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("must not be empty");
    }
    if value.len() > ATTEMPT_LABEL_MAX_LEN {
        return Err("must be at most 63 characters");
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("may only contain alphanumerics, '-', '_' and '.'");
    }
    let edges_ok = value.starts_with(|c: char| c.is_ascii_alphanumeric())
        && value.ends_with(|c: char| c.is_ascii_alphanumeric());
    if !edges_ok {
        return Err("must start and end with an alphanumeric character");
    }
    Ok(())
}

impl TryFrom<String> for AttemptLabel {
    type Error = ModelError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match validate(&value) {
            Ok(()) => Ok(Self(value)),
            Err(reason) => Err(ModelError::InvalidLabel {
                label: value,
                reason,
            }),
        }
    }
}

impl FromStr for AttemptLabel {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<AttemptLabel> for String {
    fn from(label: AttemptLabel) -> Self {
        label.0
    }
}

impl AsRef<str> for AttemptLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttemptLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
