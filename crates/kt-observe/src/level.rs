use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::LoggerError;

/// Validated `EnvFilter` expression, e.g. `"info"` or `"kt_core=debug,kube=warn,info"`.
///
/// Kept as the raw string; the filter itself is built when the logger is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the filter. Construction already proved the expression parses,
    /// so this falls back to `info` only if that somehow stops holding.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(LoggerError::InvalidLevel("empty filter".into()));
        }
        EnvFilter::try_new(&s)
            .map(|_| LoggerLevel(s.clone()))
            .map_err(|e| LoggerError::InvalidLevel(format!("{s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::LoggerLevel;

    #[test]
    fn accepts_plain_and_directive_filters() {
        for lvl in ["info", "warn", "trace", "kt_core=debug,kube=warn,info"] {
            assert!(lvl.parse::<LoggerLevel>().is_ok(), "rejected {lvl}");
        }
    }

    #[test]
    fn rejects_invalid_filters() {
        for lvl in ["", "kt_core=loud", "kube=verbose,info"] {
            assert!(lvl.parse::<LoggerLevel>().is_err(), "accepted {lvl}");
        }
    }

    #[test]
    fn default_is_info() {
        let lvl = LoggerLevel::default();
        assert_eq!(lvl.as_str(), "info");
        let _ = lvl.to_env_filter();
    }
}
