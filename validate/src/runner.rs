//! Suite execution with per-check failure isolation.

use std::time::Instant;

use crate::context::CheckContext;
use crate::registry::ValidationCheck;
use crate::report::{Report, ValidationResult};

/// Runs `checks` against the context and aggregates a report.
///
/// Checks execute in the order given (callers pass registry order).
/// For each check, in sequence:
///
/// 1. Unmet required inputs skip the check.
/// 2. A firing skip predicate skips the check.
/// 3. Otherwise the body runs; an `Err` from the body becomes an
///    `Errored` result and the remaining checks still run. This
///    isolation is the runner's central property — no check can take
///    the suite down with it.
pub fn run_suite<'r, I>(checks: I, ctx: &CheckContext<'_>) -> Report
where
    I: IntoIterator<Item = &'r ValidationCheck>,
{
    let mut results = Vec::new();
    for check in checks {
        let start = Instant::now();

        if let Some(missing) = check.missing_input(ctx) {
            results.push(ValidationResult::skipped(
                check.name,
                format!("required input absent: {missing}"),
                start.elapsed(),
            ));
            continue;
        }
        if let Some(reason) = (check.skip)(ctx) {
            results.push(ValidationResult::skipped(check.name, reason, start.elapsed()));
            continue;
        }

        match (check.run)(ctx) {
            Ok(result) => results.push(ValidationResult::completed(
                check.name,
                result.passed,
                result.measured,
                result.message,
                start.elapsed(),
            )),
            Err(err) => results.push(ValidationResult::errored(
                check.name,
                err.to_string(),
                start.elapsed(),
            )),
        }
    }
    Report::new(results)
}
