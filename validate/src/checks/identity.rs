//! Identity and duration gates.

use media::{file_digest, Locator};

use crate::context::CheckContext;
use crate::error::CheckError;
use crate::registry::CheckResult;

/// A simulation that changes nothing has failed its one job, so identical
/// artifacts are a `Fail`, not an error.
///
/// The whole-file digest runs first; equal digests fail immediately
/// without decoding a single frame. Unequal digests fall through to a
/// frame-by-frame comparison that passes on the first visible difference
/// — and still passes at end-of-stream, since the digest already proved
/// the files differ (container-level differences count).
pub(crate) fn video_not_same(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    // A missing baseline here is a defect, not a skippable configuration:
    // there is nothing to prove the simulation did anything.
    let Some(baseline) = ctx.baseline() else {
        return Ok(CheckResult::fail(
            None,
            "no baseline to compare against".to_string(),
        ));
    };

    let (Locator::File(base_path), Locator::File(sim_path)) = (baseline, &ctx.artifact.locator)
    else {
        return Err(CheckError::invalid(
            "identity comparison requires file artifacts",
        ));
    };

    if file_digest(base_path)? == file_digest(sim_path)? {
        return Ok(CheckResult::fail(
            None,
            "baseline and simulated files are byte-identical".to_string(),
        ));
    }

    let mut base_read = ctx.caps.frames.open(baseline)?;
    let mut sim_read = ctx.caps.frames.open(&ctx.artifact.locator)?;
    let mut compared = 0u64;
    loop {
        match (base_read.next_frame()?, sim_read.next_frame()?) {
            (Some(base_frame), Some(sim_frame)) => {
                compared += 1;
                if base_frame != sim_frame {
                    return Ok(CheckResult::pass(
                        Some(compared as f64),
                        format!("frames diverge at frame {compared}"),
                    ));
                }
            }
            // One stream ending early is itself a difference; both ending
            // with every frame equal still passes on digest evidence.
            _ => {
                return Ok(CheckResult::pass(
                    Some(compared as f64),
                    "files differ at container level".to_string(),
                ));
            }
        }
    }
}

/// Exact duration equality between baseline and artifact.
///
/// `frame_count / fps` on both sides, compared exactly; the source this
/// harness models compares exactly and offers no tolerance to inherit.
pub(crate) fn duration_match(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let baseline = ctx
        .baseline()
        .ok_or_else(|| CheckError::invalid("baseline required"))?;
    let base_props = ctx.caps.prober.properties(baseline)?;
    let sim_props = ctx.caps.prober.properties(&ctx.artifact.locator)?;

    let duration = |frame_count: Option<u64>, fps: f64| -> Result<f64, CheckError> {
        let count = frame_count.ok_or_else(|| CheckError::invalid("frame count unavailable"))?;
        if fps <= 0.0 {
            return Err(CheckError::invalid("frame rate unavailable"));
        }
        Ok(count as f64 / fps)
    };

    let base_duration = duration(base_props.frame_count, base_props.fps)?;
    let sim_duration = duration(sim_props.frame_count, sim_props.fps)?;

    #[allow(clippy::float_cmp)]
    let passed = base_duration == sim_duration;
    let message = format!(
        "baseline {base_duration:.3}s vs simulated {sim_duration:.3}s (exact match required)"
    );
    Ok(if passed {
        CheckResult::pass(Some(sim_duration), message)
    } else {
        CheckResult::fail(Some(sim_duration), message)
    })
}
