//! Hardware failure simulations (escalating).
//!
//! These degrade based on how often they have been invoked within the
//! current run: every 4th call produces the degraded variant. The count
//! lives on [`RunContext`], so the cadence resets with each run instead of
//! accumulating across a process.

use std::path::Path;

use crate::context::RunContext;
use crate::error::SimError;
use crate::params::SimParams;
use crate::pipeline;
use crate::registry::{
    ExecutionMode, SimCategory, SimOutput, SimulationRegistry, SimulationSpec,
};

/// Invocation cadence of the degraded variant.
const ESCALATION_PERIOD: u32 = 4;

fn hardware_failure(
    ctx: &mut RunContext<'_>,
    video: &Path,
    _params: &SimParams,
) -> Result<SimOutput, SimError> {
    let count = ctx.next_escalation("hardware_failure");
    if count % ESCALATION_PERIOD == 0 {
        return Ok(SimOutput::Pipeline(pipeline::black_source()));
    }
    Ok(SimOutput::Pipeline(pipeline::passthrough(video)))
}

fn camera_array_delay(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let delay_ms = params.require("camera_array_delay", "delay_ms")? as u32;
    let count = ctx.next_escalation("camera_array_delay");
    if count % ESCALATION_PERIOD == 0 {
        return Ok(SimOutput::Pipeline(pipeline::delayed(video, delay_ms)));
    }
    Ok(SimOutput::Pipeline(pipeline::passthrough(video)))
}

/// Registers the hardware simulations.
pub(crate) fn register(registry: &mut SimulationRegistry) {
    registry.register(SimulationSpec {
        name: "hardware_failure",
        category: SimCategory::Hardware,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new(),
        run: hardware_failure,
    });
    registry.register(SimulationSpec {
        name: "camera_array_delay",
        category: SimCategory::Hardware,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("delay_ms", 500.0),
        run: camera_array_delay,
    });
}
