use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the executor does after a shot fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep rendering the remaining shots.
    #[default]
    Isolate,
    /// Stop dispatching shots that have not started; in-flight renders finish.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(Self::Isolate),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

/// Coverage executor settings.
#[derive(Debug, Clone)]
pub struct CoverageConfig {
    /// Renders allowed in flight at once for one coverage set.
    pub max_concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            failure_policy: FailurePolicy::Isolate,
        }
    }
}

impl CoverageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default   |
    /// |----------------------------|-----------|
    /// | `COVERAGE_MAX_CONCURRENCY` | `3`       |
    /// | `COVERAGE_FAILURE_POLICY`  | `isolate` |
    pub fn from_env() -> Self {
        let max_concurrency: usize = std::env::var("COVERAGE_MAX_CONCURRENCY")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("COVERAGE_MAX_CONCURRENCY must be a valid usize");
        assert!(max_concurrency > 0, "COVERAGE_MAX_CONCURRENCY must be at least 1");

        let failure_policy: FailurePolicy = std::env::var("COVERAGE_FAILURE_POLICY")
            .unwrap_or_else(|_| "isolate".into())
            .parse()
            .expect("COVERAGE_FAILURE_POLICY must be 'isolate' or 'abort'");

        Self {
            max_concurrency,
            failure_policy,
        }
    }
}
