//! Simulation resolution and dispatch.

use std::path::Path;

use crate::context::RunContext;
use crate::error::SimError;
use crate::params::SimParams;
use crate::registry::{ExecutionMode, SimCategory, SimOutput, SimulationRegistry};

/// The result of one simulation invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimRun {
    /// Registry name of the executed simulation.
    pub simulation: String,
    /// Category copied from the registry entry.
    pub category: SimCategory,
    /// Mode copied from the registry entry.
    pub mode: ExecutionMode,
    /// What the simulation produced.
    pub output: SimOutput,
}

/// Resolves `name` against the registry and executes it on `video`.
///
/// `overrides` are merged over the registered defaults. Capability
/// failures inside the transform propagate as-is; nothing is retried.
pub fn execute(
    registry: &SimulationRegistry,
    ctx: &mut RunContext<'_>,
    name: &str,
    video: &Path,
    overrides: &SimParams,
) -> Result<SimRun, SimError> {
    let spec = registry.get(name).ok_or_else(|| SimError::UnknownSimulation {
        name: name.to_string(),
    })?;
    let params = spec.defaults.merged(overrides);
    let output = (spec.run)(ctx, video, &params)?;
    Ok(SimRun {
        simulation: spec.name.to_string(),
        category: spec.category,
        mode: spec.mode,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use media::mock::MockTransformer;
    use shape::{RecordingShaper, ShapeSpec};
    use std::path::PathBuf;

    #[test]
    fn unknown_simulation_is_typed() {
        let registry = SimulationRegistry::builtin();
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);

        let err = execute(
            &registry,
            &mut ctx,
            "time_travel",
            &PathBuf::from("a.mp4"),
            &SimParams::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::UnknownSimulation { name } if name == "time_travel"));
    }

    #[test]
    fn overrides_replace_defaults() {
        let registry = SimulationRegistry::builtin();
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("eth-test", &shaper, &transformer);

        execute(
            &registry,
            &mut ctx,
            "packet_loss",
            &PathBuf::from("a.mp4"),
            &SimParams::new().with("loss_rate", 30.0),
        )
        .unwrap();
        assert_eq!(
            shaper.installed("eth-test"),
            Some(ShapeSpec::Loss { percent: 30.0 })
        );
    }

    #[test]
    fn defaults_apply_when_no_overrides() {
        let registry = SimulationRegistry::builtin();
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("eth-test", &shaper, &transformer);

        let run = execute(
            &registry,
            &mut ctx,
            "packet_loss",
            &PathBuf::from("a.mp4"),
            &SimParams::new(),
        )
        .unwrap();
        assert_eq!(run.category, SimCategory::Network);
        assert_eq!(run.mode, ExecutionMode::PipelineDescriptor);
        assert_eq!(
            shaper.installed("eth-test"),
            Some(ShapeSpec::Loss { percent: 10.0 })
        );
    }

    #[test]
    fn file_mode_runs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mkv");
        std::fs::write(&video, b"bytes").unwrap();

        let registry = SimulationRegistry::builtin();
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);

        let run = execute(&registry, &mut ctx, "noise", &video, &SimParams::new()).unwrap();
        let SimOutput::File(artifact) = run.output else {
            panic!("expected file output");
        };
        let name = artifact
            .locator
            .as_path()
            .unwrap()
            .file_name()
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(name, "clip_temp_noise.mkv");
    }
}
