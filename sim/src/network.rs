//! Network simulations (traffic shaping + passthrough descriptor).

use std::path::Path;

use shape::ShapeSpec;

use crate::context::RunContext;
use crate::error::SimError;
use crate::params::SimParams;
use crate::pipeline;
use crate::registry::{
    ExecutionMode, SimCategory, SimOutput, SimulationRegistry, SimulationSpec,
};

/// Installs `spec` for `simulation` and returns the passthrough descriptor.
///
/// The degradation lives entirely in the interface shape; the stream
/// itself is served unmodified.
fn shape_and_serve(
    ctx: &mut RunContext<'_>,
    video: &Path,
    simulation: &str,
    spec: &ShapeSpec,
) -> Result<SimOutput, SimError> {
    ctx.apply_shape(simulation, spec)?;
    Ok(SimOutput::Pipeline(pipeline::passthrough(video)))
}

fn packet_loss(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let percent = params.require("packet_loss", "loss_rate")?;
    shape_and_serve(ctx, video, "packet_loss", &ShapeSpec::Loss { percent })
}

fn delay(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let ms = params.require("delay", "delay_ms")? as u32;
    let jitter_ms = params.require("delay", "jitter_ms")? as u32;
    shape_and_serve(ctx, video, "delay", &ShapeSpec::Delay { ms, jitter_ms })
}

fn bandwidth_limit(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let kbit = params.require("bandwidth_limit", "rate_kbit")? as u32;
    shape_and_serve(ctx, video, "bandwidth_limit", &ShapeSpec::RateLimit { kbit })
}

fn corruption(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let percent = params.require("corruption", "corrupt_rate")?;
    shape_and_serve(ctx, video, "corruption", &ShapeSpec::Corrupt { percent })
}

fn duplication(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let percent = params.require("duplication", "duplicate_rate")?;
    shape_and_serve(ctx, video, "duplication", &ShapeSpec::Duplicate { percent })
}

fn reordering(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let percent = params.require("reordering", "reorder_rate")?;
    let delay_ms = params.require("reordering", "delay_ms")? as u32;
    shape_and_serve(
        ctx,
        video,
        "reordering",
        &ShapeSpec::Reorder { percent, delay_ms },
    )
}

/// Registers the network simulations.
pub(crate) fn register(registry: &mut SimulationRegistry) {
    registry.register(SimulationSpec {
        name: "packet_loss",
        category: SimCategory::Network,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("loss_rate", 10.0),
        run: packet_loss,
    });
    registry.register(SimulationSpec {
        name: "delay",
        category: SimCategory::Network,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("delay_ms", 200.0).with("jitter_ms", 50.0),
        run: delay,
    });
    registry.register(SimulationSpec {
        name: "bandwidth_limit",
        category: SimCategory::Network,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("rate_kbit", 500.0),
        run: bandwidth_limit,
    });
    registry.register(SimulationSpec {
        name: "corruption",
        category: SimCategory::Network,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("corrupt_rate", 5.0),
        run: corruption,
    });
    registry.register(SimulationSpec {
        name: "duplication",
        category: SimCategory::Network,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("duplicate_rate", 5.0),
        run: duplication,
    });
    registry.register(SimulationSpec {
        name: "reordering",
        category: SimCategory::Network,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("reorder_rate", 25.0).with("delay_ms", 10.0),
        run: reordering,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use media::mock::MockTransformer;
    use shape::{RecordingShaper, ShapeSpec};
    use std::path::PathBuf;

    #[test]
    fn packet_loss_shapes_then_serves() {
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("eth-test", &shaper, &transformer);

        let output = packet_loss(
            &mut ctx,
            &PathBuf::from("match.mp4"),
            &SimParams::new().with("loss_rate", 10.0),
        )
        .unwrap();

        assert_eq!(
            shaper.installed("eth-test"),
            Some(ShapeSpec::Loss { percent: 10.0 })
        );
        assert_eq!(ctx.shape_owner(), Some("packet_loss"));
        let SimOutput::Pipeline(descriptor) = output else {
            panic!("expected pipeline output");
        };
        assert!(descriptor.contains("filesrc location=match.mp4"));

        ctx.teardown();
        assert_eq!(shaper.installed("eth-test"), None);
    }

    #[test]
    fn second_network_simulation_takes_over() {
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);
        let video = PathBuf::from("a.mp4");

        packet_loss(&mut ctx, &video, &SimParams::new().with("loss_rate", 5.0)).unwrap();
        bandwidth_limit(&mut ctx, &video, &SimParams::new().with("rate_kbit", 250.0)).unwrap();

        assert_eq!(ctx.shape_owner(), Some("bandwidth_limit"));
        assert_eq!(shaper.installed("lo"), Some(ShapeSpec::RateLimit { kbit: 250 }));
    }

    #[test]
    fn shape_failure_is_fatal_to_the_invocation() {
        let shaper = RecordingShaper::failing();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);

        let err = delay(
            &mut ctx,
            &PathBuf::from("a.mp4"),
            &SimParams::new().with("delay_ms", 100.0).with("jitter_ms", 0.0),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Shape(_)));
        assert_eq!(ctx.shape_owner(), None);
    }
}
