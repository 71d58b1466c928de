use serde::{Deserialize, Serialize};

use crate::error::GatherError;

const DEFAULT_LIMIT: usize = 8;

/// What the executor does with not-yet-started tasks once one task has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Policy {
    /// Launch and await every task; return the first error at the end.
    #[default]
    RunToCompletion,
    /// Stop launching new tasks once a failure is latched.
    ///
    /// Tasks already in flight still run to completion. How many trailing
    /// tasks get skipped depends on scheduling and is best-effort only.
    FailFast,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::RunToCompletion => "run-to-completion",
            Policy::FailFast => "fail-fast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatherConfig {
    /// Maximum number of tasks executing at the same time.
    pub limit: usize,
    pub policy: Policy,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            policy: Policy::RunToCompletion,
        }
    }
}

impl GatherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), GatherError> {
        validate_limit(self.limit)
    }
}

#[inline]
pub(crate) fn validate_limit(limit: usize) -> Result<(), GatherError> {
    if limit == 0 {
        return Err(GatherError::InvalidLimit { limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = GatherConfig::default();
        assert_eq!(cfg.limit, 8);
        assert_eq!(cfg.policy, Policy::RunToCompletion);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = GatherConfig::new().with_limit(0).validate().unwrap_err();
        assert_eq!(err, GatherError::InvalidLimit { limit: 0 });
    }

    #[test]
    fn deserialize_partial_config() {
        let cfg: GatherConfig = serde_json::from_str(r#"{"policy":"failFast"}"#).unwrap();
        assert_eq!(cfg.policy, Policy::FailFast);
        assert_eq!(cfg.limit, 8);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = GatherConfig::new()
            .with_limit(3)
            .with_policy(Policy::FailFast);
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"limit":3,"policy":"failFast"}"#);

        let back: GatherConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
