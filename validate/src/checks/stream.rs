//! Stream-property checks: one probed value against one literal bound.

use crate::context::CheckContext;
use crate::error::CheckError;
use crate::metrics::max_keyframe_gap;
use crate::registry::CheckResult;

pub(crate) fn resolution(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let props = ctx.caps.prober.properties(&ctx.artifact.locator)?;
    let passed = props.width >= ctx.config.min_width && props.height >= ctx.config.min_height;
    let message = format!(
        "{}x{} vs minimum {}x{}",
        props.width, props.height, ctx.config.min_width, ctx.config.min_height
    );
    Ok(if passed {
        CheckResult::pass(Some(f64::from(props.width)), message)
    } else {
        CheckResult::fail(Some(f64::from(props.width)), message)
    })
}

pub(crate) fn frame_rate(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let props = ctx.caps.prober.properties(&ctx.artifact.locator)?;
    let passed = props.fps >= ctx.config.min_fps;
    let message = format!("{:.2} fps vs minimum {:.2}", props.fps, ctx.config.min_fps);
    Ok(if passed {
        CheckResult::pass(Some(props.fps), message)
    } else {
        CheckResult::fail(Some(props.fps), message)
    })
}

pub(crate) fn bitrate(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let props = ctx.caps.prober.properties(&ctx.artifact.locator)?;
    let Some(bitrate) = props.bitrate_bps else {
        return Err(CheckError::invalid("container reports no bitrate"));
    };
    let passed = bitrate >= ctx.config.min_bitrate_bps;
    let message = format!(
        "{bitrate} bps vs minimum {}",
        ctx.config.min_bitrate_bps
    );
    Ok(if passed {
        CheckResult::pass(Some(bitrate as f64), message)
    } else {
        CheckResult::fail(Some(bitrate as f64), message)
    })
}

pub(crate) fn codec(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let props = ctx.caps.prober.properties(&ctx.artifact.locator)?;
    let passed = props.codec == ctx.config.expected_codec;
    let message = format!(
        "codec {:?} vs expected {:?}",
        props.codec, ctx.config.expected_codec
    );
    Ok(if passed {
        CheckResult::pass(None, message)
    } else {
        CheckResult::fail(None, message)
    })
}

pub(crate) fn keyframe_interval(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let kinds = ctx.caps.prober.frame_kinds(&ctx.artifact.locator)?;
    let gap = max_keyframe_gap(&kinds);
    let passed = gap <= ctx.config.max_keyframe_gap;
    let message = format!(
        "max keyframe gap {gap} frames vs maximum {}",
        ctx.config.max_keyframe_gap
    );
    Ok(if passed {
        CheckResult::pass(Some(gap as f64), message)
    } else {
        CheckResult::fail(Some(gap as f64), message)
    })
}

/// Audio checks only apply to artifacts that carry audio; a silent
/// artifact is a valid configuration, not a defect.
pub(crate) fn skip_without_audio(ctx: &CheckContext<'_>) -> Option<String> {
    match ctx.caps.prober.properties(&ctx.artifact.locator) {
        Ok(props) if !props.has_audio => Some("artifact has no audio stream".to_string()),
        // A probe failure is the check body's problem, not a skip.
        _ => None,
    }
}

pub(crate) fn audio_codec(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let props = ctx.caps.prober.properties(&ctx.artifact.locator)?;
    let Some(codec) = props.audio_codec else {
        return Err(CheckError::invalid(
            "audio stream present but codec unknown",
        ));
    };
    let passed = codec == ctx.config.expected_audio_codec;
    let message = format!(
        "audio codec {:?} vs expected {:?}",
        codec, ctx.config.expected_audio_codec
    );
    Ok(if passed {
        CheckResult::pass(None, message)
    } else {
        CheckResult::fail(None, message)
    })
}
