//! Materialization of one test: prepare, generate, build, run, analyze.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use temporal::Temporal;
use tracing::{debug, info};

use crate::environment::{CommandSpec, Environment, Toolchain};
use crate::error::{MaketestError, MaketestResult, Stage};
use crate::rules::Rules;

/// File the rules are written to inside each test directory.
pub const RULES_FILE: &str = "rules.json";
/// File the custom timing is written to inside each test directory.
pub const TIMING_FILE: &str = "timing.json";

/// Per-campaign switches applied to every job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Hand the sampled timing to the generator instead of letting it pick.
    pub use_custom_timing: bool,
    /// Run the analysis stage after a test run.
    pub postprocess: bool,
    /// Truncate the runtime log before running.
    pub reset_log: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_custom_timing: false,
            postprocess: true,
            reset_log: true,
        }
    }
}

/// Everything needed to materialize one named test.
#[derive(Debug, Clone, Copy)]
pub struct Job<'a> {
    pub name: &'a str,
    pub output_dir: &'a Path,
    pub rules: &'a Rules,
    pub options: Options,
    pub timing: &'a [Temporal],
    pub environment: &'a Environment,
}

impl Job<'_> {
    /// Directory holding this test's artifacts.
    #[must_use]
    pub fn test_dir(&self) -> PathBuf {
        self.output_dir.join(self.name)
    }
}

/// Builds (and optionally runs and analyzes) a test artifact.
///
/// Only success or failure is observable; callers do not retry.
pub trait Materializer {
    fn materialize(&mut self, job: &Job<'_>) -> MaketestResult<()>;
}

impl<M: Materializer + ?Sized> Materializer for &mut M {
    fn materialize(&mut self, job: &Job<'_>) -> MaketestResult<()> {
        (**self).materialize(job)
    }
}

impl<M: Materializer + ?Sized> Materializer for Box<M> {
    fn materialize(&mut self, job: &Job<'_>) -> MaketestResult<()> {
        (**self).materialize(job)
    }
}

/// Runs every configured stage through external commands.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    toolchain: Toolchain,
}

impl Pipeline {
    #[must_use]
    pub const fn new(toolchain: Toolchain) -> Self {
        Self { toolchain }
    }

    #[must_use]
    pub const fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }
}

impl Materializer for Pipeline {
    fn materialize(&mut self, job: &Job<'_>) -> MaketestResult<()> {
        let test_dir = prepare(job)?;
        let env = job.environment;
        let vars = placeholders(job, &test_dir);

        run_stage(
            Stage::Generate,
            self.toolchain.generate.as_ref(),
            &env.generate_directory,
            &vars,
        )?;
        run_stage(
            Stage::Build,
            self.toolchain.build.as_ref(),
            &env.workspace_directory,
            &vars,
        )?;
        if job.options.reset_log {
            reset_log(&env.logfile())?;
        }
        run_stage(
            Stage::Run,
            self.toolchain.run.as_ref(),
            &env.runtime_directory,
            &vars,
        )?;
        if job.options.postprocess {
            run_stage(
                Stage::Postprocess,
                self.toolchain.postprocess.as_ref(),
                &env.analysis_directory,
                &vars,
            )?;
        }

        info!(name = job.name, "materialized test");
        Ok(())
    }
}

/// Writes the rules (and timing) without invoking any external tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl Materializer for DryRun {
    fn materialize(&mut self, job: &Job<'_>) -> MaketestResult<()> {
        let test_dir = prepare(job)?;
        info!(name = job.name, dir = %test_dir.display(), "prepared test (dry run)");
        Ok(())
    }
}

fn prepare(job: &Job<'_>) -> MaketestResult<PathBuf> {
    let test_dir = job.test_dir();
    fs::create_dir_all(&test_dir).map_err(|err| MaketestError::io(&test_dir, err))?;

    let rules = serde_json::to_string_pretty(job.rules).map_err(|err| MaketestError::Serialize {
        what: "rules",
        source: err,
    })?;
    write_file(&test_dir.join(RULES_FILE), &rules)?;

    if job.options.use_custom_timing {
        let timing =
            serde_json::to_string_pretty(job.timing).map_err(|err| MaketestError::Serialize {
                what: "timing",
                source: err,
            })?;
        write_file(&test_dir.join(TIMING_FILE), &timing)?;
    }

    debug!(name = job.name, stage = %Stage::Prepare, "stage complete");
    Ok(test_dir)
}

fn write_file(path: &Path, contents: &str) -> MaketestResult<()> {
    fs::write(path, contents).map_err(|err| MaketestError::io(path, err))
}

fn reset_log(path: &Path) -> MaketestResult<()> {
    fs::File::create(path).map_err(|err| MaketestError::io(path, err))?;
    debug!(log = %path.display(), stage = %Stage::ResetLog, "stage complete");
    Ok(())
}

fn placeholders(job: &Job<'_>, test_dir: &Path) -> Vec<(&'static str, String)> {
    let env = job.environment;
    vec![
        ("name", job.name.to_owned()),
        ("test_dir", test_dir.display().to_string()),
        ("rules", test_dir.join(RULES_FILE).display().to_string()),
        ("timing", test_dir.join(TIMING_FILE).display().to_string()),
        ("log", env.logfile().display().to_string()),
        (
            "results",
            env.results_directory.join(job.name).display().to_string(),
        ),
        ("workspace", env.workspace_directory.display().to_string()),
    ]
}

fn run_stage(
    stage: Stage,
    spec: Option<&CommandSpec>,
    dir: &Path,
    vars: &[(&str, String)],
) -> MaketestResult<()> {
    let Some(spec) = spec else {
        debug!(%stage, "no command configured, skipping");
        return Ok(());
    };

    let args = spec.expand(vars);
    debug!(%stage, program = %spec.program, ?args, dir = %dir.display(), "running stage");
    let status = Command::new(&spec.program)
        .args(&args)
        .current_dir(dir)
        .status()
        .map_err(|err| MaketestError::Spawn {
            stage,
            program: spec.program.clone(),
            source: err,
        })?;

    if !status.success() {
        return Err(MaketestError::StageFailed {
            stage,
            status: status.code(),
        });
    }
    Ok(())
}
