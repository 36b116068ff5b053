//! Typed simulation registry.

use std::fmt;
use std::path::Path;

use media::MediaArtifact;

use crate::context::RunContext;
use crate::error::SimError;
use crate::params::SimParams;
use crate::{camera, hardware, network};

/// Which family of degradation a simulation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCategory {
    /// Transport-level impairment via traffic shaping.
    Network,
    /// Optical and sensor artifacts.
    Camera,
    /// Compression and bitrate degradation.
    Encoding,
    /// Equipment failure modes.
    Hardware,
}

impl SimCategory {
    /// The category label used in listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Camera => "camera",
            Self::Encoding => "encoding",
            Self::Hardware => "hardware",
        }
    }
}

impl fmt::Display for SimCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a simulation produces its artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Returns a launch descriptor for the external media server.
    PipelineDescriptor,
    /// Materializes a derived file through the transformer capability.
    FileTransform,
}

/// What a simulation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimOutput {
    /// Declarative pipeline for the external media server to serve.
    Pipeline(String),
    /// A derived file on disk, baseline attached.
    File(MediaArtifact),
}

/// A simulation transform body.
pub type SimFn =
    fn(&mut RunContext<'_>, &Path, &SimParams) -> Result<SimOutput, SimError>;

/// One registered simulation.
pub struct SimulationSpec {
    /// Unique registry key.
    pub name: &'static str,
    /// Degradation family.
    pub category: SimCategory,
    /// How the artifact is produced.
    pub mode: ExecutionMode,
    /// Default parameters, overridable per invocation.
    pub defaults: SimParams,
    /// The transform body.
    pub run: SimFn,
}

impl fmt::Debug for SimulationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationSpec")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("mode", &self.mode)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// The set of available simulations, in registration order.
///
/// Built once at process start; a name registered twice keeps the original
/// position but the later entry wins.
#[derive(Debug, Default)]
pub struct SimulationRegistry {
    entries: Vec<SimulationSpec>,
}

impl SimulationRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a simulation. Re-registering a name overwrites the
    /// previous entry in place.
    pub fn register(&mut self, spec: SimulationSpec) {
        match self.entries.iter().position(|e| e.name == spec.name) {
            Some(idx) => self.entries[idx] = spec,
            None => self.entries.push(spec),
        }
    }

    /// Looks up a simulation by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SimulationSpec> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All registered simulations, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SimulationSpec> {
        self.entries.iter()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Number of registered simulations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full built-in simulation set.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        camera::register(&mut registry);
        network::register(&mut registry);
        hardware::register(&mut registry);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(
        _ctx: &mut RunContext<'_>,
        _video: &Path,
        _params: &SimParams,
    ) -> Result<SimOutput, SimError> {
        Ok(SimOutput::Pipeline(String::new()))
    }

    fn spec(name: &'static str) -> SimulationSpec {
        SimulationSpec {
            name,
            category: SimCategory::Camera,
            mode: ExecutionMode::PipelineDescriptor,
            defaults: SimParams::new(),
            run: noop,
        }
    }

    #[test]
    fn registration_order_is_preserved() {
        let mut registry = SimulationRegistry::new();
        registry.register(spec("zulu"));
        registry.register(spec("alpha"));
        registry.register(spec("mike"));
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn reregistering_overwrites_in_place() {
        let mut registry = SimulationRegistry::new();
        registry.register(spec("blur"));
        registry.register(spec("noise"));

        let mut replacement = spec("blur");
        replacement.category = SimCategory::Encoding;
        registry.register(replacement);

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["blur", "noise"]);
        assert_eq!(registry.get("blur").unwrap().category, SimCategory::Encoding);
    }

    #[test]
    fn builtin_set_is_complete() {
        let registry = SimulationRegistry::builtin();
        for name in [
            "brightness",
            "dynamic_brightness",
            "contrast",
            "dynamic_contrast",
            "simple_blur",
            "complex_blur",
            "noise",
            "horizontal_drift",
            "low_resolution",
            "compression_artifacts",
            "low_bitrate",
            "packet_loss",
            "delay",
            "bandwidth_limit",
            "corruption",
            "duplication",
            "reordering",
            "hardware_failure",
            "camera_array_delay",
        ] {
            assert!(registry.get(name).is_some(), "missing builtin {name}");
        }
    }

    #[test]
    fn builtin_order_is_stable_across_builds() {
        let first: Vec<_> = SimulationRegistry::builtin().names().collect();
        let second: Vec<_> = SimulationRegistry::builtin().names().collect();
        assert_eq!(first, second);
    }
}
