//! Campaign configuration: environment, sweep bounds, rule defaults, policy.

use std::fs;
use std::ops::{Range, RangeInclusive};
use std::path::Path;

use maketest::{Environment, ExecutionMode, Options, Rules, Toolchain};
use serde::{Deserialize, Serialize};
use temporal::PeriodRange;
use utilisation::UtilisationSampler;

use crate::error::ConfigError;
use crate::point::SweepPoint;

/// What to do when a trial or artifact fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the whole campaign on the first error.
    #[default]
    FailFast,
    /// Record the error, skip the failed trial or artifact, keep going.
    SkipAndContinue,
}

/// Transformation applied to the working timing set between chain lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthStep {
    /// Keep the trial's timing unchanged for every chain length.
    #[default]
    Hold,
    /// Add one base execution chunk per chain and recompute its period.
    Accumulate,
}

/// How the timing mapper picks a period from the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodSelection {
    /// Smallest period that reproduces the fraction.
    Smallest,
    /// Uniformly among periods that reproduce the fraction.
    #[default]
    Uniform,
}

/// Bounds of the parameter sweep and the sampler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Desired total utilisation of the system under test.
    pub total_utilisation: f64,
    /// Minimum acceptable per-chain share of the total.
    pub min_fraction: f64,
    /// Re-sampling budget for one trial.
    pub max_attempts: usize,
    pub chain_count: usize,
    /// First trial (inclusive).
    pub trial_start: u64,
    /// Last trial (exclusive).
    pub trial_end: u64,
    pub period_min_us: f64,
    pub period_max_us: f64,
    pub period_step_us: f64,
    pub chain_length_start: usize,
    pub chain_length_end: usize,
    pub executor_count_start: usize,
    pub executor_count_end: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            total_utilisation: 0.6,
            min_fraction: 0.05,
            max_attempts: 5000,
            chain_count: 5,
            trial_start: 0,
            trial_end: 50,
            period_min_us: 1000.0,
            period_max_us: 1_000_000.0,
            period_step_us: 50_000.0,
            chain_length_start: 2,
            chain_length_end: 10,
            executor_count_start: 4,
            executor_count_end: 4,
        }
    }
}

impl SweepConfig {
    #[must_use]
    pub const fn trials(&self) -> Range<u64> {
        self.trial_start..self.trial_end
    }

    #[must_use]
    pub const fn chain_lengths(&self) -> RangeInclusive<usize> {
        self.chain_length_start..=self.chain_length_end
    }

    #[must_use]
    pub const fn executor_counts(&self) -> RangeInclusive<usize> {
        self.executor_count_start..=self.executor_count_end
    }

    #[must_use]
    pub const fn sampler(&self) -> UtilisationSampler {
        UtilisationSampler::new(
            self.min_fraction,
            self.total_utilisation,
            self.max_attempts,
            self.chain_count,
        )
    }

    #[must_use]
    pub const fn period_range(&self) -> PeriodRange {
        PeriodRange::new(self.period_min_us, self.period_max_us)
    }

    /// Number of artifacts a complete sweep materializes.
    #[must_use]
    pub fn artifact_count(&self) -> usize {
        let trials = usize::try_from(self.trial_end.saturating_sub(self.trial_start))
            .unwrap_or(usize::MAX);
        trials
            .saturating_mul(self.chain_lengths().count())
            .saturating_mul(self.executor_counts().count())
            .saturating_mul(ExecutionMode::PAIR.len())
    }
}

/// Structural rule values shared by every generated test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub chain_merge_p: f64,
    pub chain_sync_p: f64,
    pub chain_variance: f64,
    pub hyperperiod_count: u32,
    /// Cap on a single test run.
    pub max_duration_us: u64,
    pub logging_mode: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            chain_merge_p: 0.0,
            chain_sync_p: 0.0,
            chain_variance: 0.25,
            hyperperiod_count: 0,
            max_duration_us: 60_000_000,
            logging_mode: 2,
        }
    }
}

/// Complete, file-loadable campaign configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub environment: Environment,
    pub sweep: SweepConfig,
    pub rules: RulesConfig,
    pub options: Options,
    pub toolchain: Toolchain,
    pub policy: FailurePolicy,
    pub length_step: LengthStep,
    pub period_selection: PeriodSelection,
}

impl CampaignConfig {
    /// Reads a JSON configuration; missing sections keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Rejects configurations the sweep cannot execute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sweep = &self.sweep;
        check(
            sweep.min_fraction > 0.0 && sweep.min_fraction < 1.0,
            "sweep.min_fraction",
            || format!("{} is not in (0, 1)", sweep.min_fraction),
        )?;
        check(
            sweep.total_utilisation.is_finite() && sweep.total_utilisation > 0.0,
            "sweep.total_utilisation",
            || format!("{} is not positive", sweep.total_utilisation),
        )?;
        check(sweep.chain_count > 0, "sweep.chain_count", || {
            "at least one chain is required".to_owned()
        })?;
        check(
            sweep.min_fraction * sweep.chain_count as f64 <= sweep.total_utilisation,
            "sweep.min_fraction",
            || {
                format!(
                    "{} chains at {} each exceed total {}",
                    sweep.chain_count, sweep.min_fraction, sweep.total_utilisation
                )
            },
        )?;
        check(sweep.trial_start <= sweep.trial_end, "sweep.trial_end", || {
            format!("{} is before start {}", sweep.trial_end, sweep.trial_start)
        })?;
        check(
            sweep.chain_length_start > 0 && sweep.chain_length_start <= sweep.chain_length_end,
            "sweep.chain_length_start",
            || {
                format!(
                    "[{}, {}] is not a non-empty range of positive lengths",
                    sweep.chain_length_start, sweep.chain_length_end
                )
            },
        )?;
        check(
            sweep.executor_count_start > 0
                && sweep.executor_count_start <= sweep.executor_count_end,
            "sweep.executor_count_start",
            || {
                format!(
                    "[{}, {}] is not a non-empty range of positive counts",
                    sweep.executor_count_start, sweep.executor_count_end
                )
            },
        )?;
        sweep
            .period_range()
            .validate_step(sweep.period_step_us)
            .map_err(|err| ConfigError::Invalid {
                field: "sweep.period",
                reason: err.to_string(),
            })?;
        let rules = &self.rules;
        for (field, value) in [
            ("rules.chain_merge_p", rules.chain_merge_p),
            ("rules.chain_sync_p", rules.chain_sync_p),
            ("rules.chain_variance", rules.chain_variance),
        ] {
            check((0.0..=1.0).contains(&value), field, || {
                format!("{value} is not in [0, 1]")
            })?;
        }
        check(
            !(self.options.reset_log && self.environment.logfile_name.is_empty()),
            "environment.logfile_name",
            || "required when options.reset_log is set".to_owned(),
        )?;
        Ok(())
    }

    /// Rules for `point` in the given mode.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn rules_for(&self, point: SweepPoint, mode: ExecutionMode) -> Rules {
        Rules {
            name: point.artifact_name(mode),
            directory: self.environment.tests_directory.clone(),
            chain_count: self.sweep.chain_count,
            chain_avg_len: point.chain_length,
            chain_merge_p: self.rules.chain_merge_p,
            chain_sync_p: self.rules.chain_sync_p,
            chain_variance: self.rules.chain_variance,
            util_total: self.sweep.total_utilisation,
            min_period_us: self.sweep.period_min_us as u64,
            max_period_us: self.sweep.period_max_us as u64,
            period_step_us: self.sweep.period_step_us,
            hyperperiod_count: self.rules.hyperperiod_count,
            max_duration_us: self.rules.max_duration_us,
            ppe: mode.is_enhanced(),
            executor_count: point.executor_count,
            random_seed: point.trial,
            logging_mode: self.rules.logging_mode,
        }
    }
}

fn check(
    ok: bool,
    field: &'static str,
    reason: impl FnOnce() -> String,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason(),
        })
    }
}
