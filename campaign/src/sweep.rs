//! Nested sweep over trials, chain lengths and executor counts.

use maketest::{ExecutionMode, Job, Materializer};
use temporal::{accumulate, Temporal, TimingMapper};
use tracing::{debug, error, info, warn};
use utilisation::SplitGenerator;

use crate::config::{CampaignConfig, FailurePolicy, LengthStep};
use crate::error::{CampaignError, CampaignResult};
use crate::point::SweepPoint;
use crate::report::{CampaignReport, FailureRecord};

/// Drives one campaign.
///
/// Utilisation and timing are derived once per trial and held fixed across
/// that trial's chain lengths and executor counts. Each sweep point produces an
/// enhanced and a standard test from the same rules and timing.
#[derive(Debug)]
pub struct SweepDriver<G, T, M> {
    config: CampaignConfig,
    generator: G,
    mapper: T,
    materializer: M,
}

impl<G, T, M> SweepDriver<G, T, M>
where
    G: SplitGenerator,
    T: TimingMapper,
    M: Materializer,
{
    /// Validates `config` and assembles a driver.
    pub fn new(
        config: CampaignConfig,
        generator: G,
        mapper: T,
        materializer: M,
    ) -> CampaignResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            generator,
            mapper,
            materializer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// Returns the generator, mapper and materializer.
    pub fn into_parts(self) -> (G, T, M) {
        (self.generator, self.mapper, self.materializer)
    }

    /// Runs every sweep point in order.
    ///
    /// Under [`FailurePolicy::FailFast`] the first error is returned and nothing
    /// already materialized is cleaned up.
    pub fn run(&mut self) -> CampaignResult<CampaignReport> {
        let policy = self.config.policy;
        let mut report = CampaignReport::new(policy);
        info!(
            artifacts = self.config.sweep.artifact_count(),
            ?policy,
            "starting campaign"
        );

        for trial in self.config.sweep.trials() {
            if self.run_trial(trial, &mut report)? {
                report.trials_completed += 1;
            } else {
                report.trials_skipped += 1;
            }
        }

        info!(
            materialized = report.materialized.len(),
            failures = report.failures.len(),
            "campaign finished"
        );
        Ok(report)
    }

    /// Returns `Ok(false)` when the trial was abandoned under skip-and-continue.
    fn run_trial(&mut self, trial: u64, report: &mut CampaignReport) -> CampaignResult<bool> {
        let policy = self.config.policy;
        let sweep = &self.config.sweep;
        let sampler = sweep.sampler();
        let range = sweep.period_range();
        let step_us = sweep.period_step_us;
        let lengths = sweep.chain_lengths();
        let executors = sweep.executor_counts();
        let last_length = *lengths.end();

        let base_us = match sampler.derive(&mut self.generator) {
            Ok(split) => split,
            Err(source) => {
                handle(policy, report, CampaignError::Derivation { trial, source })?;
                return Ok(false);
            }
        };
        let base_ts = match self.mapper.map(range, step_us, base_us.as_slice()) {
            Ok(records) => records,
            Err(source) => {
                handle(policy, report, CampaignError::TimingMapping { trial, source })?;
                return Ok(false);
            }
        };
        debug!(
            trial,
            utilisation = ?base_us.as_slice(),
            timing = ?base_ts,
            "derived trial timing"
        );

        let mut work_ts: Vec<Temporal> = base_ts.clone();
        for chain_length in lengths {
            for executor_count in executors.clone() {
                let point = SweepPoint::new(trial, chain_length, executor_count);
                self.run_point(point, &work_ts, report)?;
            }

            if chain_length < last_length {
                let stepped = self.step_length(&mut work_ts, &base_ts, base_us.as_slice());
                if let Err(source) = stepped {
                    handle(policy, report, CampaignError::TimingMapping { trial, source })?;
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn run_point(
        &mut self,
        point: SweepPoint,
        timing: &[Temporal],
        report: &mut CampaignReport,
    ) -> CampaignResult<()> {
        let mut rules = self.config.rules_for(point, ExecutionMode::Enhanced);
        info!(
            enhanced = %point.artifact_name(ExecutionMode::Enhanced),
            standard = %point.artifact_name(ExecutionMode::Standard),
            "generating tests"
        );

        for mode in ExecutionMode::PAIR {
            rules.set_variant(point.artifact_name(mode), mode);
            let job = Job {
                name: &rules.name,
                output_dir: &self.config.environment.tests_directory,
                rules: &rules,
                options: self.config.options,
                timing,
                environment: &self.config.environment,
            };
            match self.materializer.materialize(&job) {
                Ok(()) => report.materialized.push(rules.name.clone()),
                Err(source) => handle(
                    self.config.policy,
                    report,
                    CampaignError::Materialization {
                        point,
                        name: rules.name.clone(),
                        source,
                    },
                )?,
            }
        }
        Ok(())
    }

    fn step_length(
        &self,
        work: &mut [Temporal],
        base: &[Temporal],
        utilisations: &[f64],
    ) -> temporal::TemporalResult<()> {
        match self.config.length_step {
            LengthStep::Hold => Ok(()),
            LengthStep::Accumulate => accumulate(work, base, utilisations),
        }
    }
}

fn handle(
    policy: FailurePolicy,
    report: &mut CampaignReport,
    err: CampaignError,
) -> CampaignResult<()> {
    match policy {
        FailurePolicy::FailFast => {
            error!(error = %err, "aborting campaign");
            Err(err)
        }
        FailurePolicy::SkipAndContinue => {
            warn!(error = %err, "skipping after failure");
            report.failures.push(FailureRecord::from(&err));
            Ok(())
        }
    }
}
