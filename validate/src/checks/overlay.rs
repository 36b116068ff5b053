//! Overlay presence check.

use media::load_overlay;

use crate::context::CheckContext;
use crate::error::CheckError;
use crate::metrics::best_correlation;
use crate::registry::CheckResult;

/// The reference overlay (e.g. the scoreboard) must survive degradation.
///
/// Every Nth frame is matched against the template; the overlay counts as
/// present only after the configured number of *consecutive* sampled
/// frames match above the correlation threshold. A single spurious match
/// is not presence.
pub(crate) fn overlay_present(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let overlay = ctx
        .aux
        .overlay
        .as_ref()
        .ok_or_else(|| CheckError::invalid("overlay image required"))?;
    let template = load_overlay(ctx.caps.frames, overlay)?;

    let stride = ctx.config.overlay_stride.max(1);
    let needed = ctx.config.overlay_consecutive.max(1);

    let mut read = ctx.caps.frames.open(&ctx.artifact.locator)?;
    let mut index = 0usize;
    let mut consecutive = 0usize;
    let mut best_seen = -1.0f64;
    let mut sampled = 0usize;

    while let Some(frame) = read.next_frame()? {
        let sample_now = index % stride == 0;
        index += 1;
        if !sample_now {
            continue;
        }
        sampled += 1;
        let correlation = best_correlation(&frame, &template);
        best_seen = best_seen.max(correlation);
        if correlation >= ctx.config.overlay_correlation {
            consecutive += 1;
            if consecutive >= needed {
                return Ok(CheckResult::pass(
                    Some(correlation),
                    format!(
                        "overlay matched on {needed} consecutive sampled frames \
                         (correlation {correlation:.3})"
                    ),
                ));
            }
        } else {
            consecutive = 0;
        }
    }

    if sampled == 0 {
        return Err(CheckError::invalid("artifact decoded to zero frames"));
    }
    Ok(CheckResult::fail(
        Some(best_seen),
        format!(
            "overlay never matched {needed} consecutive sampled frames \
             (best correlation {best_seen:.3} vs minimum {})",
            ctx.config.overlay_correlation
        ),
    ))
}
