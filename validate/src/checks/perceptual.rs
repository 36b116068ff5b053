//! Perceptual quality check.

use crate::context::CheckContext;
use crate::error::CheckError;
use crate::registry::CheckResult;

/// Perceptual scoring is expensive and optional; configuration can turn
/// it off wholesale.
pub(crate) fn skip_when_disabled(ctx: &CheckContext<'_>) -> Option<String> {
    if ctx.config.perceptual_enabled {
        None
    } else {
        Some("perceptual scoring disabled by configuration".to_string())
    }
}

/// Aggregate perceptual score from the external scorer, compared against
/// the configured floor. Frame-pair comparison lives entirely in the
/// capability.
pub(crate) fn perceptual_quality(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let baseline = ctx
        .baseline()
        .ok_or_else(|| CheckError::invalid("baseline required"))?;
    let score = ctx.caps.scorer.score(baseline, &ctx.artifact.locator)?;
    let metric = ctx.caps.scorer.metric().label();
    let passed = score >= ctx.config.min_perceptual_score;
    let message = format!(
        "{metric} score {score:.2} vs minimum {}",
        ctx.config.min_perceptual_score
    );
    Ok(if passed {
        CheckResult::pass(Some(score), message)
    } else {
        CheckResult::fail(Some(score), message)
    })
}
