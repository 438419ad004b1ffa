use std::cell::Cell;
use std::fs;

use campaign::{
    CampaignConfig, CampaignError, ConfigError, FailurePolicy, LengthStep, SweepConfig,
    SweepDriver, SweepPoint,
};
use maketest::{
    DryRun, ExecutionMode, Job, MaketestError, MaketestResult, Materializer, Rules, Stage,
    RULES_FILE,
};
use temporal::{GridMapper, Temporal};

const SPLIT: [f64; 3] = [0.25, 0.25, 0.125];

#[derive(Default)]
struct Recorder {
    attempted: Vec<String>,
    accepted: Vec<(Rules, Vec<Temporal>)>,
    fail_on: Option<&'static str>,
}

impl Materializer for Recorder {
    fn materialize(&mut self, job: &Job<'_>) -> MaketestResult<()> {
        self.attempted.push(job.name.to_owned());
        if self.fail_on == Some(job.name) {
            return Err(MaketestError::StageFailed {
                stage: Stage::Run,
                status: Some(1),
            });
        }
        self.accepted.push((job.rules.clone(), job.timing.to_vec()));
        Ok(())
    }
}

fn small_campaign() -> CampaignConfig {
    let mut config = CampaignConfig::default();
    config.sweep = SweepConfig {
        total_utilisation: 0.625,
        min_fraction: 0.05,
        max_attempts: 10,
        chain_count: 3,
        trial_start: 0,
        trial_end: 2,
        period_min_us: 1000.0,
        period_max_us: 100_000.0,
        period_step_us: 1000.0,
        chain_length_start: 2,
        chain_length_end: 3,
        executor_count_start: 4,
        executor_count_end: 4,
    };
    config
}

fn fixed_split(_total: f64, _fragments: usize) -> Vec<f64> {
    SPLIT.to_vec()
}

fn base_timing() -> Vec<Temporal> {
    vec![
        Temporal::new(1000.0, 250.0),
        Temporal::new(1000.0, 250.0),
        Temporal::new(1000.0, 125.0),
    ]
}

#[test]
fn sweep_materializes_every_pair_in_order() {
    let calls = Cell::new(0_usize);
    let generator = |total: f64, fragments: usize| {
        calls.set(calls.get() + 1);
        fixed_split(total, fragments)
    };
    let mut recorder = Recorder::default();

    let mut driver =
        SweepDriver::new(small_campaign(), generator, GridMapper::default(), &mut recorder)
            .unwrap();
    let report = driver.run().unwrap();
    drop(driver);

    let expected = [
        "test_c2_e4_t0_ppe",
        "test_c2_e4_t0_std",
        "test_c3_e4_t0_ppe",
        "test_c3_e4_t0_std",
        "test_c2_e4_t1_ppe",
        "test_c2_e4_t1_std",
        "test_c3_e4_t1_ppe",
        "test_c3_e4_t1_std",
    ];
    assert_eq!(recorder.attempted, expected);
    assert_eq!(report.materialized, expected);
    assert!(report.is_clean());
    assert_eq!(report.trials_completed, 2);
    assert_eq!(calls.get(), 2, "one derivation per trial");

    for (name, (rules, _)) in expected.iter().zip(&recorder.accepted) {
        let (point, mode) = SweepPoint::parse_artifact_name(name).unwrap();
        assert_eq!(rules.random_seed, point.trial);
        assert_eq!(rules.chain_avg_len, point.chain_length);
        assert_eq!(rules.executor_count, point.executor_count);
        assert_eq!(rules.ppe, mode.is_enhanced());
    }
}

#[test]
fn pairs_differ_only_in_name_and_mode() {
    let mut recorder = Recorder::default();
    let mut driver = SweepDriver::new(
        small_campaign(),
        fixed_split,
        GridMapper::default(),
        &mut recorder,
    )
    .unwrap();
    driver.run().unwrap();
    drop(driver);

    for pair in recorder.accepted.chunks(2) {
        let (enhanced, enhanced_timing) = &pair[0];
        let (standard, standard_timing) = &pair[1];
        assert_eq!(enhanced.mode(), ExecutionMode::Enhanced);
        assert_eq!(standard.mode(), ExecutionMode::Standard);
        assert_eq!(enhanced_timing, standard_timing);

        let mut aligned = standard.clone();
        aligned.set_variant(enhanced.name.clone(), ExecutionMode::Enhanced);
        assert_eq!(&aligned, enhanced);
    }
}

#[test]
fn hold_keeps_trial_timing_across_lengths() {
    let mut recorder = Recorder::default();
    let mut driver = SweepDriver::new(
        small_campaign(),
        fixed_split,
        GridMapper::default(),
        &mut recorder,
    )
    .unwrap();
    driver.run().unwrap();
    drop(driver);

    for (_, timing) in &recorder.accepted {
        assert_eq!(timing, &base_timing());
    }
}

#[test]
fn accumulate_grows_timing_between_lengths() {
    let mut config = small_campaign();
    config.length_step = LengthStep::Accumulate;
    config.sweep.trial_end = 1;
    let mut recorder = Recorder::default();
    let mut driver =
        SweepDriver::new(config, fixed_split, GridMapper::default(), &mut recorder).unwrap();
    driver.run().unwrap();
    drop(driver);

    let grown = vec![
        Temporal::new(2000.0, 500.0),
        Temporal::new(2000.0, 500.0),
        Temporal::new(2000.0, 250.0),
    ];
    let timings: Vec<_> = recorder.accepted.iter().map(|(_, t)| t.clone()).collect();
    assert_eq!(
        timings,
        vec![base_timing(), base_timing(), grown.clone(), grown]
    );
}

fn two_executor_counts() -> CampaignConfig {
    let mut config = small_campaign();
    config.sweep.trial_end = 1;
    config.sweep.executor_count_end = 5;
    config
}

fn names(recorder: &Recorder) -> Vec<&str> {
    recorder
        .accepted
        .iter()
        .map(|(rules, _)| rules.name.as_str())
        .collect()
}

#[test]
fn executor_counts_nest_inside_chain_lengths() {
    let mut recorder = Recorder::default();
    let mut driver = SweepDriver::new(
        two_executor_counts(),
        fixed_split,
        GridMapper::default(),
        &mut recorder,
    )
    .unwrap();
    driver.run().unwrap();
    drop(driver);

    assert_eq!(
        names(&recorder),
        [
            "test_c2_e4_t0_ppe",
            "test_c2_e4_t0_std",
            "test_c2_e5_t0_ppe",
            "test_c2_e5_t0_std",
            "test_c3_e4_t0_ppe",
            "test_c3_e4_t0_std",
            "test_c3_e5_t0_ppe",
            "test_c3_e5_t0_std",
        ]
    );
    for (rules, timing) in &recorder.accepted {
        let (point, _) = SweepPoint::parse_artifact_name(&rules.name).unwrap();
        assert_eq!(rules.executor_count, point.executor_count);
        assert_eq!(timing, &base_timing(), "hold keeps one timing set per trial");
    }
}

#[test]
fn accumulate_steps_only_between_chain_lengths() {
    let mut config = two_executor_counts();
    config.length_step = LengthStep::Accumulate;
    let mut recorder = Recorder::default();
    let mut driver =
        SweepDriver::new(config, fixed_split, GridMapper::default(), &mut recorder).unwrap();
    driver.run().unwrap();
    drop(driver);

    let grown = vec![
        Temporal::new(2000.0, 500.0),
        Temporal::new(2000.0, 500.0),
        Temporal::new(2000.0, 250.0),
    ];
    for (rules, timing) in &recorder.accepted {
        let (point, _) = SweepPoint::parse_artifact_name(&rules.name).unwrap();
        let expected = if point.chain_length == 2 {
            base_timing()
        } else {
            grown.clone()
        };
        assert_eq!(timing, &expected, "{}", rules.name);
    }
    assert_eq!(recorder.accepted.len(), 8);
}

#[test]
fn fail_fast_stops_at_first_failing_artifact() {
    let mut recorder = Recorder {
        fail_on: Some("test_c3_e4_t0_std"),
        ..Recorder::default()
    };
    let mut driver = SweepDriver::new(
        small_campaign(),
        fixed_split,
        GridMapper::default(),
        &mut recorder,
    )
    .unwrap();
    let err = driver.run().unwrap_err();
    drop(driver);

    match &err {
        CampaignError::Materialization { point, name, .. } => {
            assert_eq!(name, "test_c3_e4_t0_std");
            assert_eq!(*point, SweepPoint::new(0, 3, 4));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.artifact(), Some("test_c3_e4_t0_std"));
    assert_eq!(recorder.attempted.len(), 4);
    assert_eq!(recorder.accepted.len(), 3);
}

#[test]
fn skip_and_continue_records_failure_and_finishes() {
    let mut config = small_campaign();
    config.policy = FailurePolicy::SkipAndContinue;
    let mut recorder = Recorder {
        fail_on: Some("test_c3_e4_t0_std"),
        ..Recorder::default()
    };
    let mut driver =
        SweepDriver::new(config, fixed_split, GridMapper::default(), &mut recorder).unwrap();
    let report = driver.run().unwrap();
    drop(driver);

    assert_eq!(recorder.attempted.len(), 8);
    assert_eq!(report.materialized.len(), 7);
    assert!(!report.materialized.iter().any(|n| n == "test_c3_e4_t0_std"));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].trial, Some(0));
    assert_eq!(
        report.failures[0].artifact.as_deref(),
        Some("test_c3_e4_t0_std")
    );
    assert_eq!(report.trials_completed, 2);
}

#[test]
fn exhausted_trial_is_skipped_under_skip_and_continue() {
    let mut config = small_campaign();
    config.policy = FailurePolicy::SkipAndContinue;
    config.sweep.max_attempts = 1;
    let calls = Cell::new(0_usize);
    let generator = |_total: f64, _fragments: usize| {
        calls.set(calls.get() + 1);
        if calls.get() == 1 {
            vec![0.01, 0.3, 0.315]
        } else {
            SPLIT.to_vec()
        }
    };
    let mut recorder = Recorder::default();
    let mut driver =
        SweepDriver::new(config, generator, GridMapper::default(), &mut recorder).unwrap();
    let report = driver.run().unwrap();
    drop(driver);

    assert_eq!(report.trials_skipped, 1);
    assert_eq!(report.trials_completed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].trial, Some(0));
    assert_eq!(report.failures[0].artifact, None);
    assert_eq!(report.artifact_failures(), 0);
    assert_eq!(report.materialized.len(), 4);
    assert!(report.materialized.iter().all(|n| n.contains("_t1_")));
}

#[test]
fn exhausted_trial_aborts_under_fail_fast() {
    let mut config = small_campaign();
    config.sweep.max_attempts = 3;
    let mut recorder = Recorder::default();
    let starved = |_total: f64, _fragments: usize| vec![0.01, 0.3, 0.315];
    let mut driver =
        SweepDriver::new(config, starved, GridMapper::default(), &mut recorder).unwrap();
    let err = driver.run().unwrap_err();
    drop(driver);

    assert!(matches!(err, CampaignError::Derivation { trial: 0, .. }));
    assert!(recorder.attempted.is_empty());
}

#[test]
fn unmappable_fraction_is_reported_per_trial() {
    let mut config = small_campaign();
    config.policy = FailurePolicy::SkipAndContinue;
    config.sweep.period_max_us = 2000.0;
    config.sweep.min_fraction = 0.0001;
    // 0.0001 of a 2ms period rounds to zero microseconds.
    let tiny = |_total: f64, _fragments: usize| vec![0.0001, 0.3, 0.3249];
    let mut recorder = Recorder::default();
    let mut driver =
        SweepDriver::new(config, tiny, GridMapper::default(), &mut recorder).unwrap();
    let report = driver.run().unwrap();
    drop(driver);

    assert_eq!(report.trials_skipped, 2);
    assert!(report.materialized.is_empty());
    assert!(report.failures[0].error.contains("timing mapping failed"));
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let mut config = small_campaign();
    config.sweep.chain_count = 0;
    let result = SweepDriver::new(config, fixed_split, GridMapper::default(), DryRun);
    assert!(matches!(
        result,
        Err(CampaignError::Config(ConfigError::Invalid {
            field: "sweep.chain_count",
            ..
        }))
    ));
}

#[test]
fn dry_run_writes_rules_for_every_artifact() {
    let root = std::env::temp_dir().join(format!("chainsweep-sweep-{}", std::process::id()));
    let _ = fs::remove_dir_all(&root);
    let mut config = small_campaign();
    config.sweep.trial_end = 1;
    config.environment.tests_directory = root.clone();

    let mut driver = SweepDriver::new(config, fixed_split, GridMapper::default(), DryRun).unwrap();
    assert_eq!(driver.config().sweep.artifact_count(), 4);
    let report = driver.run().unwrap();
    assert_eq!(report.materialized.len(), 4);

    for name in &report.materialized {
        let contents = fs::read_to_string(root.join(name).join(RULES_FILE)).unwrap();
        let rules: Rules = serde_json::from_str(&contents).unwrap();
        assert_eq!(&rules.name, name);
        assert_eq!(rules.directory, root);
    }
    let _ = fs::remove_dir_all(&root);
}
