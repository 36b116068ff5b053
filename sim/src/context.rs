//! Per-run mutable state.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use media::Transformer;
use shape::{ShapeController, ShapeSpec};

use crate::error::SimError;

/// Mutable state scoped to one harness invocation.
///
/// The context owns everything a run must clean up: the traffic shape it
/// may have installed, the temp artifacts its simulations materialized,
/// and the escalation counters that make repeated invocations of the same
/// simulation behave differently. Nothing here is process-global, so
/// repeated or interleaved runs in one process cannot leak into each
/// other.
pub struct RunContext<'a> {
    interface: String,
    shaper: &'a dyn ShapeController,
    transformer: &'a dyn Transformer,
    shape_owner: Option<String>,
    escalation: HashMap<String, u32>,
    temp_artifacts: Vec<PathBuf>,
    torn_down: bool,
}

impl<'a> RunContext<'a> {
    /// Creates a context for one run.
    pub fn new(
        interface: impl Into<String>,
        shaper: &'a dyn ShapeController,
        transformer: &'a dyn Transformer,
    ) -> Self {
        Self {
            interface: interface.into(),
            shaper,
            transformer,
            shape_owner: None,
            escalation: HashMap::new(),
            temp_artifacts: Vec::new(),
            torn_down: false,
        }
    }

    /// The interface network simulations shape.
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// The transform capability for file-mode simulations.
    #[must_use]
    pub fn transformer(&self) -> &dyn Transformer {
        self.transformer
    }

    /// The simulation currently holding the interface, if any.
    #[must_use]
    pub fn shape_owner(&self) -> Option<&str> {
        self.shape_owner.as_deref()
    }

    /// Installs a traffic shape on behalf of `simulation`.
    ///
    /// Replacing an existing shape without reverting it first is allowed
    /// (last writer wins); ownership moves to the new simulation either
    /// way.
    pub fn apply_shape(&mut self, simulation: &str, spec: &ShapeSpec) -> Result<(), SimError> {
        self.shaper.apply(&self.interface, spec)?;
        self.shape_owner = Some(simulation.to_string());
        Ok(())
    }

    /// Increments and returns the escalation count for `simulation`.
    ///
    /// The first call returns 1.
    pub fn next_escalation(&mut self, simulation: &str) -> u32 {
        let count = self.escalation.entry(simulation.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Records a temp artifact this run owns and must delete on teardown.
    pub fn register_temp(&mut self, path: impl Into<PathBuf>) {
        self.temp_artifacts.push(path.into());
    }

    /// The temp artifacts registered so far.
    #[must_use]
    pub fn temp_artifacts(&self) -> &[PathBuf] {
        &self.temp_artifacts
    }

    /// Transfers ownership of the temp artifacts to the caller.
    ///
    /// A run that completes successfully hands its derived files to the
    /// caller as deliverables; teardown then has nothing left to delete.
    /// Interrupted or failed runs never call this, so their partial
    /// artifacts are cleaned up as usual.
    #[must_use]
    pub fn release_temps(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.temp_artifacts)
    }

    /// Releases everything this run holds.
    ///
    /// The shape revert is attempted unconditionally — even when no
    /// simulation claimed the interface — because revert is idempotent
    /// and a previous run may have died without cleaning up. Temp
    /// artifact deletion is best-effort. Calling teardown twice is a
    /// no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.shaper.revert(&self.interface);
        self.shape_owner = None;
        for path in self.temp_artifacts.drain(..) {
            let _ = fs::remove_file(&path);
        }
    }
}

impl Drop for RunContext<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media::mock::MockTransformer;
    use shape::{RecordingShaper, ShapeEvent};

    #[test]
    fn escalation_counts_per_simulation() {
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);

        assert_eq!(ctx.next_escalation("hardware_failure"), 1);
        assert_eq!(ctx.next_escalation("hardware_failure"), 2);
        assert_eq!(ctx.next_escalation("camera_array_delay"), 1);
    }

    #[test]
    fn apply_shape_claims_interface() {
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("eth-test", &shaper, &transformer);

        ctx.apply_shape("packet_loss", &ShapeSpec::Loss { percent: 10.0 })
            .unwrap();
        assert_eq!(ctx.shape_owner(), Some("packet_loss"));
        assert_eq!(
            shaper.installed("eth-test"),
            Some(ShapeSpec::Loss { percent: 10.0 })
        );
        ctx.teardown();
    }

    #[test]
    fn teardown_reverts_even_without_owner() {
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);
        ctx.teardown();

        assert_eq!(
            shaper.events(),
            vec![ShapeEvent::Reverted {
                interface: "lo".to_string()
            }]
        );
    }

    #[test]
    fn teardown_twice_reverts_once() {
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);
        ctx.teardown();
        ctx.teardown();
        assert_eq!(shaper.events().len(), 1);
    }

    #[test]
    fn drop_tears_down() {
        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        {
            let mut ctx = RunContext::new("lo", &shaper, &transformer);
            ctx.apply_shape("delay", &ShapeSpec::Delay { ms: 100, jitter_ms: 0 })
                .unwrap();
        }
        assert_eq!(shaper.installed("lo"), None);
    }

    #[test]
    fn released_temps_survive_teardown() {
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join("clip_temp_noise.mp4");
        std::fs::write(&temp, b"derived").unwrap();

        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);
        ctx.register_temp(&temp);
        let released = ctx.release_temps();
        ctx.teardown();

        assert_eq!(released, vec![temp.clone()]);
        assert!(temp.exists());
    }

    #[test]
    fn teardown_deletes_temp_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join("clip_temp_noise.mp4");
        std::fs::write(&temp, b"derived").unwrap();

        let shaper = RecordingShaper::new();
        let transformer = MockTransformer::new();
        let mut ctx = RunContext::new("lo", &shaper, &transformer);
        ctx.register_temp(&temp);
        ctx.teardown();

        assert!(!temp.exists());
    }
}
