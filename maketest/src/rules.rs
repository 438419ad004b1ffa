//! Generation rules handed to the test generator.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Scheduling-strategy variant of a generated test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Priority-propagating executor ("ppe").
    Enhanced,
    /// Stock executor baseline ("std").
    Standard,
}

impl ExecutionMode {
    /// Both modes, enhanced first.
    pub const PAIR: [Self; 2] = [Self::Enhanced, Self::Standard];

    /// Suffix used in artifact names.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Enhanced => "ppe",
            Self::Standard => "std",
        }
    }

    /// Parses an artifact-name suffix.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ppe" => Some(Self::Enhanced),
            "std" => Some(Self::Standard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_enhanced(self) -> bool {
        matches!(self, Self::Enhanced)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Complete set of rules for one generated test.
///
/// Field names match what the generator reads from `rules.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Artifact name, `test_c<L>_e<E>_t<T>_<mode>`.
    pub name: String,
    /// Directory the generator writes the test into.
    pub directory: PathBuf,
    /// Number of chains.
    pub chain_count: usize,
    /// Average number of tasks per chain.
    pub chain_avg_len: usize,
    /// Probability that two chains merge.
    pub chain_merge_p: f64,
    /// Probability that a chain has a synchronisation point.
    pub chain_sync_p: f64,
    /// Relative spread of chain lengths around the average.
    pub chain_variance: f64,
    /// Total utilisation over all chains.
    pub util_total: f64,
    pub min_period_us: u64,
    pub max_period_us: u64,
    pub period_step_us: f64,
    /// Hyperperiods to run; zero leaves the duration to `max_duration_us`.
    pub hyperperiod_count: u32,
    /// Cap on the test's run time.
    pub max_duration_us: u64,
    /// Execution-mode flag; `true` selects [`ExecutionMode::Enhanced`].
    pub ppe: bool,
    /// Executor threads available to the test.
    pub executor_count: usize,
    /// Seed for the generator's own randomness.
    pub random_seed: u64,
    /// Verbosity of the runtime's event log.
    pub logging_mode: u8,
}

impl Rules {
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        if self.ppe {
            ExecutionMode::Enhanced
        } else {
            ExecutionMode::Standard
        }
    }

    /// Switches the variant; only the name and mode flag change.
    pub fn set_variant(&mut self, name: impl Into<String>, mode: ExecutionMode) {
        self.name = name.into();
        self.ppe = mode.is_enhanced();
    }
}
