//! Shape controller interface and implementations.

use std::process::Command;
use std::sync::Mutex;

use crate::error::ShapeApplyError;
use crate::spec::{netem_args, revert_args, ShapeSpec};

/// Capability that installs and clears traffic shapes on an interface.
pub trait ShapeController {
    /// Installs `spec` on `interface`, replacing any shape already there.
    fn apply(&self, interface: &str, spec: &ShapeSpec) -> Result<(), ShapeApplyError>;

    /// Clears any shape from `interface`.
    ///
    /// Best-effort: reverting an interface with nothing applied succeeds
    /// silently, and failures never propagate to the caller.
    fn revert(&self, interface: &str);
}

/// `tc`-backed controller.
#[derive(Debug, Clone)]
pub struct TcShapeController {
    binary: String,
}

impl Default for TcShapeController {
    fn default() -> Self {
        Self {
            binary: "tc".to_string(),
        }
    }
}

impl TcShapeController {
    /// Uses a specific tc binary instead of the one on `PATH`.
    #[must_use]
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl ShapeController for TcShapeController {
    fn apply(&self, interface: &str, spec: &ShapeSpec) -> Result<(), ShapeApplyError> {
        let output = Command::new(&self.binary)
            .args(netem_args(interface, spec))
            .output()?;
        if !output.status.success() {
            return Err(ShapeApplyError::CommandFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    fn revert(&self, interface: &str) {
        // `tc qdisc del` fails when no qdisc is installed; that is the
        // idempotent-revert case and is deliberately ignored.
        let _ = Command::new(&self.binary)
            .args(revert_args(interface))
            .output();
    }
}

/// One recorded controller interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeEvent {
    /// `apply(interface, spec)` was called.
    Applied { interface: String, spec: ShapeSpec },
    /// `revert(interface)` was called.
    Reverted { interface: String },
}

/// A controller that records calls instead of touching the kernel.
#[derive(Debug, Default)]
pub struct RecordingShaper {
    events: Mutex<Vec<ShapeEvent>>,
    fail_apply: bool,
}

impl RecordingShaper {
    /// A recording controller whose applies succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording controller whose applies fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_apply: true,
        }
    }

    /// Everything that happened, in call order.
    #[must_use]
    pub fn events(&self) -> Vec<ShapeEvent> {
        self.events.lock().expect("shaper lock").clone()
    }

    /// The spec currently installed on `interface`, replaying the event
    /// log: the last apply not followed by a revert.
    #[must_use]
    pub fn installed(&self, interface: &str) -> Option<ShapeSpec> {
        let mut current = None;
        for event in self.events() {
            match event {
                ShapeEvent::Applied {
                    interface: applied_on,
                    spec,
                } if applied_on == interface => current = Some(spec),
                ShapeEvent::Reverted {
                    interface: reverted_on,
                } if reverted_on == interface => current = None,
                _ => {}
            }
        }
        current
    }
}

impl ShapeController for RecordingShaper {
    fn apply(&self, interface: &str, spec: &ShapeSpec) -> Result<(), ShapeApplyError> {
        if self.fail_apply {
            return Err(ShapeApplyError::CommandFailed {
                status: Some(2),
                stderr: "recording shaper configured to fail".to_string(),
            });
        }
        self.events.lock().expect("shaper lock").push(ShapeEvent::Applied {
            interface: interface.to_string(),
            spec: *spec,
        });
        Ok(())
    }

    fn revert(&self, interface: &str) {
        self.events.lock().expect("shaper lock").push(ShapeEvent::Reverted {
            interface: interface.to_string(),
        });
    }
}
