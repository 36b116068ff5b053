//! Runner-level properties: isolation, ordering, skip semantics.

use media::mock::{MockProber, MockScorer, SyntheticSource};
use media::{GrayFrame, Locator, MediaArtifact};
use validate::{
    run_suite, AuxInputs, Capabilities, CheckContext, CheckError, CheckOutcome, CheckResult,
    InputKind, ValidationCheck, ValidationConfig, ValidationRegistry,
};

fn passing(_ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    Ok(CheckResult::pass(Some(1.0), "ok".to_string()))
}

fn failing(_ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    Ok(CheckResult::fail(Some(0.0), "below threshold".to_string()))
}

fn exploding(_ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    Err(CheckError::invalid("capability fell over"))
}

fn never_skip(_ctx: &CheckContext<'_>) -> Option<String> {
    None
}

fn check(name: &'static str, run: validate::CheckFn) -> ValidationCheck {
    ValidationCheck {
        name,
        requires: &[InputKind::Artifact],
        skip: never_skip,
        run,
    }
}

struct Fixture {
    prober: MockProber,
    frames: SyntheticSource,
    scorer: MockScorer,
    config: ValidationConfig,
    artifact: MediaArtifact,
    aux: AuxInputs,
}

impl Fixture {
    fn new() -> Self {
        Self {
            prober: MockProber::hd(),
            frames: SyntheticSource::new(vec![GrayFrame::filled(8, 8, 100)]),
            scorer: MockScorer::new(90.0),
            config: ValidationConfig::for_testing(),
            artifact: MediaArtifact::new(Locator::Stream("mem:sim".to_string()))
                .with_baseline(Locator::Stream("mem:base".to_string())),
            aux: AuxInputs::default(),
        }
    }

    fn ctx(&self) -> CheckContext<'_> {
        CheckContext {
            caps: Capabilities {
                prober: &self.prober,
                frames: &self.frames,
                scorer: &self.scorer,
            },
            config: &self.config,
            artifact: &self.artifact,
            aux: &self.aux,
        }
    }
}

#[test]
fn erroring_check_does_not_abort_the_suite() {
    let mut registry = ValidationRegistry::new();
    registry.register(check("first", passing));
    registry.register(check("second", exploding));
    registry.register(check("third", passing));
    registry.register(check("fourth", failing));

    let fixture = Fixture::new();
    let report = run_suite(registry.iter(), &fixture.ctx());

    let outcomes: Vec<(String, CheckOutcome)> = report
        .results
        .iter()
        .map(|r| (r.check.clone(), r.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("first".to_string(), CheckOutcome::Pass),
            ("second".to_string(), CheckOutcome::Errored),
            ("third".to_string(), CheckOutcome::Pass),
            ("fourth".to_string(), CheckOutcome::Fail),
        ]
    );
    assert_eq!(report.errored_count, 1);
    assert_eq!(report.failed_count, 1);
    assert_eq!(report.exit_code(), 1);

    let errored = &report.results[1];
    assert!(errored.message.contains("capability fell over"));
}

#[test]
fn two_runs_produce_identical_ordering_and_outcomes() {
    let registry = ValidationRegistry::builtin();
    let fixture = Fixture::new();

    let first = run_suite(registry.iter(), &fixture.ctx());
    let second = run_suite(registry.iter(), &fixture.ctx());

    let names = |report: &validate::Report| -> Vec<String> {
        report.results.iter().map(|r| r.check.clone()).collect()
    };
    let outcomes = |report: &validate::Report| -> Vec<CheckOutcome> {
        report.results.iter().map(|r| r.outcome).collect()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(outcomes(&first), outcomes(&second));
}

#[test]
fn suite_order_matches_registration_order() {
    let registry = ValidationRegistry::builtin();
    let fixture = Fixture::new();
    let report = run_suite(registry.iter(), &fixture.ctx());

    let executed: Vec<String> = report.results.iter().map(|r| r.check.clone()).collect();
    let registered: Vec<String> = registry.names().map(str::to_string).collect();
    assert_eq!(executed, registered);
}

#[test]
fn audio_checks_skip_on_silent_artifacts_without_failing_the_run() {
    let mut fixture = Fixture::new();
    fixture.prober = MockProber::new(media::StreamProperties {
        width: 1920,
        height: 1080,
        fps: 30.0,
        bitrate_bps: Some(4_000_000),
        codec: "h264".to_string(),
        frame_count: Some(300),
        has_audio: false,
        audio_codec: None,
    });

    let registry = ValidationRegistry::builtin();
    let selected = registry.select(&["audio_codec"]).unwrap();
    let report = run_suite(selected, &fixture.ctx());

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].outcome, CheckOutcome::Skipped);
    assert!(report.results[0].message.contains("no audio stream"));
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn unmet_required_inputs_skip_rather_than_fail() {
    let fixture = Fixture::new(); // no logs, no overlay supplied
    let registry = ValidationRegistry::builtin();
    let selected = registry
        .select(&["ocr_similarity", "error_log_similarity", "overlay_present"])
        .unwrap();
    let report = run_suite(selected, &fixture.ctx());

    for result in &report.results {
        assert_eq!(result.outcome, CheckOutcome::Skipped, "{}", result.check);
        assert!(result.message.contains("required input absent"));
    }
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn missing_baseline_skips_baseline_checks_but_fails_identity() {
    let mut fixture = Fixture::new();
    fixture.artifact = MediaArtifact::new(Locator::Stream("mem:sim".to_string()));

    let registry = ValidationRegistry::builtin();
    let selected = registry
        .select(&["brightness_shift", "duration_match", "video_not_same"])
        .unwrap();
    let report = run_suite(selected, &fixture.ctx());

    let by_name = |name: &str| {
        report
            .results
            .iter()
            .find(|r| r.check == name)
            .unwrap_or_else(|| panic!("{name} missing from report"))
    };
    // Baseline is declared required for the statistic and duration gates.
    assert_eq!(by_name("brightness_shift").outcome, CheckOutcome::Skipped);
    assert_eq!(by_name("duration_match").outcome, CheckOutcome::Skipped);
    // The identity check treats the absence as a defect.
    assert_eq!(by_name("video_not_same").outcome, CheckOutcome::Fail);
}

#[test]
fn perceptual_check_honors_the_disable_flag() {
    let mut fixture = Fixture::new();
    fixture.config.perceptual_enabled = false;

    let registry = ValidationRegistry::builtin();
    let selected = registry.select(&["perceptual_quality"]).unwrap();
    let report = run_suite(selected, &fixture.ctx());

    assert_eq!(report.results[0].outcome, CheckOutcome::Skipped);
    assert!(report.results[0].message.contains("disabled"));
}
