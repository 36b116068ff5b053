//! Camera and encoding simulations (file-transform mode).

use std::path::Path;

use media::{derived_path, FilterSpec, Locator, MediaArtifact};

use crate::context::RunContext;
use crate::error::SimError;
use crate::params::SimParams;
use crate::pipeline;
use crate::registry::{
    ExecutionMode, SimCategory, SimOutput, SimulationRegistry, SimulationSpec,
};

/// Materializes a derived file for `simulation` and hands ownership of it
/// to the context.
fn materialize(
    ctx: &mut RunContext<'_>,
    video: &Path,
    simulation: &str,
    spec: &FilterSpec,
) -> Result<SimOutput, SimError> {
    let output = derived_path(video, simulation)?;
    ctx.transformer().apply(video, &output, spec)?;
    ctx.register_temp(output.clone());
    Ok(SimOutput::File(
        MediaArtifact::new(Locator::File(output)).with_baseline(Locator::File(video.to_path_buf())),
    ))
}

fn brightness(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let factor = params.require("brightness", "factor")?;
    let spec = FilterSpec::video_filter(format!("eq=brightness={factor}"));
    materialize(ctx, video, "brightness", &spec)
}

fn dynamic_brightness(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let amplitude = params.require("dynamic_brightness", "amplitude")?;
    let spec = FilterSpec::video_filter(format!("eq=brightness='{amplitude}*sin(t)'"));
    materialize(ctx, video, "dynamic_brightness", &spec)
}

fn contrast(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let factor = params.require("contrast", "factor")?;
    let spec = FilterSpec::video_filter(format!("eq=contrast={factor}"));
    materialize(ctx, video, "contrast", &spec)
}

fn dynamic_contrast(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let amplitude = params.require("dynamic_contrast", "amplitude")?;
    let spec = FilterSpec::video_filter(format!("eq=contrast='1+{amplitude}*sin(t)'"));
    materialize(ctx, video, "dynamic_contrast", &spec)
}

fn simple_blur(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let radius = params.require("simple_blur", "radius")?;
    let spec = FilterSpec::video_filter(format!("boxblur={radius}:1"));
    materialize(ctx, video, "simple_blur", &spec)
}

fn complex_blur(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let sigma = params.require("complex_blur", "sigma")?;
    let spec = FilterSpec::video_filter(format!("gblur=sigma={sigma}:steps=2"));
    materialize(ctx, video, "complex_blur", &spec)
}

fn noise(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let strength = params.require("noise", "strength")?;
    let spec = FilterSpec::video_filter(format!("noise=alls={strength}:allf=t+u"));
    materialize(ctx, video, "noise", &spec)
}

fn horizontal_drift(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let speed = params.require("horizontal_drift", "speed")?;
    let spec = FilterSpec::video_filter(format!("scroll=horizontal={speed}"));
    materialize(ctx, video, "horizontal_drift", &spec)
}

fn low_resolution(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let width = params.require("low_resolution", "width")?;
    let height = params.require("low_resolution", "height")?;
    let spec = FilterSpec::video_filter(format!("scale={}:{}", width as u32, height as u32));
    materialize(ctx, video, "low_resolution", &spec)
}

fn compression_artifacts(
    ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let crf = params.require("compression_artifacts", "crf")?;
    let spec = FilterSpec::default().with_output_args([
        "-c:v".to_string(),
        "libx264".to_string(),
        "-crf".to_string(),
        format!("{}", crf as u32),
    ]);
    materialize(ctx, video, "compression_artifacts", &spec)
}

fn low_bitrate(
    _ctx: &mut RunContext<'_>,
    video: &Path,
    params: &SimParams,
) -> Result<SimOutput, SimError> {
    let kbit = params.require("low_bitrate", "bitrate_kbit")?;
    Ok(SimOutput::Pipeline(pipeline::low_bitrate(
        video,
        kbit as u32,
    )))
}

/// Registers the camera and encoding simulations.
pub(crate) fn register(registry: &mut SimulationRegistry) {
    registry.register(SimulationSpec {
        name: "brightness",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("factor", 0.35),
        run: brightness,
    });
    registry.register(SimulationSpec {
        name: "dynamic_brightness",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("amplitude", 0.3),
        run: dynamic_brightness,
    });
    registry.register(SimulationSpec {
        name: "contrast",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("factor", 1.8),
        run: contrast,
    });
    registry.register(SimulationSpec {
        name: "dynamic_contrast",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("amplitude", 0.5),
        run: dynamic_contrast,
    });
    registry.register(SimulationSpec {
        name: "simple_blur",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("radius", 5.0),
        run: simple_blur,
    });
    registry.register(SimulationSpec {
        name: "complex_blur",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("sigma", 4.0),
        run: complex_blur,
    });
    registry.register(SimulationSpec {
        name: "noise",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("strength", 20.0),
        run: noise,
    });
    registry.register(SimulationSpec {
        name: "horizontal_drift",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("speed", 0.002),
        run: horizontal_drift,
    });
    registry.register(SimulationSpec {
        name: "low_resolution",
        category: SimCategory::Camera,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("width", 640.0).with("height", 360.0),
        run: low_resolution,
    });
    registry.register(SimulationSpec {
        name: "compression_artifacts",
        category: SimCategory::Encoding,
        mode: ExecutionMode::FileTransform,
        defaults: SimParams::new().with("crf", 45.0),
        run: compression_artifacts,
    });
    registry.register(SimulationSpec {
        name: "low_bitrate",
        category: SimCategory::Encoding,
        mode: ExecutionMode::PipelineDescriptor,
        defaults: SimParams::new().with("bitrate_kbit", 50.0),
        run: low_bitrate,
    });
}
