//! Validation outcomes and the aggregated report.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// The typed outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    /// The check ran and the measured value met its threshold.
    Pass,
    /// The check ran and the measured value failed its threshold.
    Fail,
    /// The check did not run: a required input was absent or the skip
    /// predicate fired. Contributes to neither failure count.
    Skipped,
    /// The check could not run to completion; the error is isolated here
    /// instead of aborting the suite.
    Errored,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skipped => "skipped",
            Self::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// The recorded result of one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Registry name of the check.
    pub check: String,
    /// What happened.
    pub outcome: CheckOutcome,
    /// The measured value, when the check produced one.
    pub measured: Option<f64>,
    /// Human-readable detail: threshold comparison, skip reason, or error.
    pub message: String,
    /// Wall-clock time the check took.
    pub elapsed: Duration,
}

impl ValidationResult {
    /// A passed or failed result from a completed check.
    #[must_use]
    pub fn completed(
        check: &str,
        passed: bool,
        measured: Option<f64>,
        message: String,
        elapsed: Duration,
    ) -> Self {
        Self {
            check: check.to_string(),
            outcome: if passed {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail
            },
            measured,
            message,
            elapsed,
        }
    }

    /// A skipped result.
    #[must_use]
    pub fn skipped(check: &str, reason: String, elapsed: Duration) -> Self {
        Self {
            check: check.to_string(),
            outcome: CheckOutcome::Skipped,
            measured: None,
            message: reason,
            elapsed,
        }
    }

    /// An errored result, isolating a failed check body.
    #[must_use]
    pub fn errored(check: &str, error: String, elapsed: Duration) -> Self {
        Self {
            check: check.to_string(),
            outcome: CheckOutcome::Errored,
            measured: None,
            message: error,
            elapsed,
        }
    }
}

/// The ordered results of one suite run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Results in execution order.
    pub results: Vec<ValidationResult>,
    /// Number of `Fail` outcomes.
    pub failed_count: usize,
    /// Number of `Errored` outcomes.
    pub errored_count: usize,
}

impl Report {
    /// Aggregates results into a report.
    #[must_use]
    pub fn new(results: Vec<ValidationResult>) -> Self {
        let failed_count = results
            .iter()
            .filter(|r| r.outcome == CheckOutcome::Fail)
            .count();
        let errored_count = results
            .iter()
            .filter(|r| r.outcome == CheckOutcome::Errored)
            .count();
        Self {
            results,
            failed_count,
            errored_count,
        }
    }

    /// Zero iff every outcome is `Pass` or `Skipped`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.failed_count + self.errored_count > 0 {
            1
        } else {
            0
        }
    }

    /// The failing and errored results, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, CheckOutcome::Fail | CheckOutcome::Errored))
    }
}
