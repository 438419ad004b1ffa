//! Outcome of a campaign run, written as `summary.json`.

use serde::Serialize;

use crate::config::FailurePolicy;
use crate::error::CampaignError;

/// One recorded failure under [`FailurePolicy::SkipAndContinue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub trial: Option<u64>,
    /// Artifact name for materialization failures; `None` when a whole trial was skipped.
    pub artifact: Option<String>,
    pub error: String,
}

impl From<&CampaignError> for FailureRecord {
    fn from(err: &CampaignError) -> Self {
        Self {
            trial: err.trial(),
            artifact: err.artifact().map(str::to_owned),
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignReport {
    pub policy: FailurePolicy,
    /// Artifacts the materializer accepted, in sweep order.
    pub materialized: Vec<String>,
    pub failures: Vec<FailureRecord>,
    pub trials_completed: u64,
    pub trials_skipped: u64,
}

impl CampaignReport {
    #[must_use]
    pub const fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            materialized: Vec::new(),
            failures: Vec::new(),
            trials_completed: 0,
            trials_skipped: 0,
        }
    }

    /// `true` if every attempted artifact was materialized.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures of single artifacts; skipped trials are counted in
    /// `trials_skipped` instead.
    #[must_use]
    pub fn artifact_failures(&self) -> usize {
        self.failures
            .iter()
            .filter(|record| record.artifact.is_some())
            .count()
    }

    /// Artifacts handed to the materializer, whether or not they succeeded.
    #[must_use]
    pub fn artifacts_attempted(&self) -> usize {
        self.materialized.len() + self.artifact_failures()
    }
}
