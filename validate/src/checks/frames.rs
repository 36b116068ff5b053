//! Frame-statistic checks.
//!
//! These assert the simulation *changed* something: the pass condition is
//! that the baseline/artifact difference strictly exceeds the significance
//! threshold, the inverse of a usual quality gate. A difference exactly
//! equal to the threshold does not count as significant.

use media::{GrayFrame, Locator};

use crate::context::CheckContext;
use crate::error::CheckError;
use crate::metrics::{
    average_stat, column_profile_mean, laplacian_variance, luma_stddev, mean_luma,
};
use crate::registry::CheckResult;

fn averaged(
    ctx: &CheckContext<'_>,
    input: &Locator,
    cap: usize,
    stat: fn(&GrayFrame) -> f64,
) -> Result<f64, CheckError> {
    let mut read = ctx.caps.frames.open(input)?;
    average_stat(&mut *read, cap, stat)?
        .ok_or_else(|| CheckError::invalid(format!("{input} decoded to zero frames")))
}

/// Shared shape of every frame-statistic check.
fn significant_shift(
    ctx: &CheckContext<'_>,
    stat: fn(&GrayFrame) -> f64,
    stat_label: &str,
    threshold: f64,
    cap: usize,
) -> Result<CheckResult, CheckError> {
    let baseline = ctx
        .baseline()
        .ok_or_else(|| CheckError::invalid("baseline required"))?;
    let base_avg = averaged(ctx, baseline, cap, stat)?;
    let sim_avg = averaged(ctx, &ctx.artifact.locator, cap, stat)?;
    let difference = (sim_avg - base_avg).abs();

    let message = format!(
        "{stat_label} difference {difference:.2} (baseline {base_avg:.2}, simulated {sim_avg:.2}) \
         vs significance threshold {threshold}"
    );
    Ok(if difference > threshold {
        CheckResult::pass(Some(difference), message)
    } else {
        CheckResult::fail(Some(difference), message)
    })
}

pub(crate) fn brightness_shift(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    significant_shift(
        ctx,
        mean_luma,
        "mean luma",
        ctx.config.brightness_threshold,
        ctx.config.stat_frame_cap,
    )
}

pub(crate) fn contrast_shift(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    significant_shift(
        ctx,
        luma_stddev,
        "luma stddev",
        ctx.config.contrast_threshold,
        ctx.config.stat_frame_cap,
    )
}

pub(crate) fn blur_shift(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    significant_shift(
        ctx,
        laplacian_variance,
        "laplacian variance",
        ctx.config.blur_threshold,
        ctx.config.stat_frame_cap,
    )
}

pub(crate) fn noise_shift(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    significant_shift(
        ctx,
        laplacian_variance,
        "laplacian variance",
        ctx.config.noise_threshold,
        ctx.config.stat_frame_cap,
    )
}

pub(crate) fn horizontal_drift_shift(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    significant_shift(
        ctx,
        column_profile_mean,
        "column profile",
        ctx.config.drift_threshold,
        ctx.config.drift_frame_cap,
    )
}
