use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use campaign::{CampaignConfig, CampaignReport, FailurePolicy, PeriodSelection, SweepDriver};
use clap::{Parser, ValueEnum};
use maketest::{DryRun, Materializer, Pipeline};
use temporal::{GridMapper, TimingMapper, UniformGridMapper};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utilisation::UUniFast;

#[derive(Parser)]
#[command(
    name = "chainsweep",
    version,
    about = "Paired executor test campaign generator"
)]
struct Cli {
    /// JSON campaign configuration; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the directory generated tests are written to.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Override the failure policy from the configuration.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// RNG seed for utilisation and period sampling.
    #[arg(long)]
    seed: Option<u64>,
    /// Only write rules and timing; run no external tools.
    #[arg(long)]
    dry_run: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    FailFast,
    SkipAndContinue,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FailFast => Self::FailFast,
            PolicyArg::SkipAndContinue => Self::SkipAndContinue,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => CampaignConfig::load(path).context("load campaign config")?,
        None => CampaignConfig::default(),
    };
    if let Some(output) = cli.output {
        config.environment.tests_directory = output;
    }
    if let Some(policy) = cli.policy {
        config.policy = policy.into();
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "sampling seed");

    let mapper: Box<dyn TimingMapper> = match config.period_selection {
        PeriodSelection::Smallest => Box::new(GridMapper::default()),
        PeriodSelection::Uniform => Box::new(UniformGridMapper::seeded(seed.wrapping_add(1))),
    };
    let materializer: Box<dyn Materializer> = if cli.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(Pipeline::new(config.toolchain.clone()))
    };

    let results_directory = config.environment.results_directory.clone();
    let mut driver = SweepDriver::new(config, UUniFast::seeded(seed), mapper, materializer)
        .context("invalid campaign configuration")?;
    let report = driver.run().context("campaign aborted")?;

    write_summary_json(&results_directory, &report)?;
    if !report.is_clean() {
        anyhow::bail!(
            "{} of {} artifacts failed, {} trials skipped",
            report.artifact_failures(),
            report.artifacts_attempted(),
            report.trials_skipped
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn write_summary_json(out_dir: &Path, report: &CampaignReport) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create results dir {}", out_dir.display()))?;
    let path = out_dir.join("summary.json");
    let contents = serde_json::to_string_pretty(report).context("serialize summary")?;
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
