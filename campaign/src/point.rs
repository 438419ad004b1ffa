//! Sweep points and the artifact naming convention.

use std::fmt;

use maketest::ExecutionMode;
use serde::Serialize;

const NAME_PREFIX: &str = "test_c";

/// One experiment configuration: (trial, chain length, executor count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SweepPoint {
    pub trial: u64,
    pub chain_length: usize,
    pub executor_count: usize,
}

impl SweepPoint {
    #[must_use]
    pub const fn new(trial: u64, chain_length: usize, executor_count: usize) -> Self {
        Self {
            trial,
            chain_length,
            executor_count,
        }
    }

    /// `test_c<chainLength>_e<executorCount>_t<trialIndex>_<mode>`.
    #[must_use]
    pub fn artifact_name(&self, mode: ExecutionMode) -> String {
        format!(
            "{NAME_PREFIX}{}_e{}_t{}_{}",
            self.chain_length,
            self.executor_count,
            self.trial,
            mode.suffix()
        )
    }

    /// Parses a name produced by [`SweepPoint::artifact_name`].
    #[must_use]
    pub fn parse_artifact_name(name: &str) -> Option<(Self, ExecutionMode)> {
        let rest = name.strip_prefix(NAME_PREFIX)?;
        let mut fields = rest.split('_');
        let chain_length = fields.next()?.parse().ok()?;
        let executor_count = fields.next()?.strip_prefix('e')?.parse().ok()?;
        let trial = fields.next()?.strip_prefix('t')?.parse().ok()?;
        let mode = ExecutionMode::from_suffix(fields.next()?)?;
        if fields.next().is_some() {
            return None;
        }
        Some((Self::new(trial, chain_length, executor_count), mode))
    }
}

impl fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trial {} chain length {} executors {}",
            self.trial, self.chain_length, self.executor_count
        )
    }
}
