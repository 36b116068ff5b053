//! Network impairment control for the vstress harness.
//!
//! Network-category simulations degrade the transport rather than the
//! pixels: delay, loss, bandwidth caps, corruption, duplication, and
//! reordering applied to a network interface through the kernel's netem
//! qdisc. This crate owns the controller interface the simulation executor
//! talks to, the netem argument construction, and a recording controller
//! for orchestration tests.
//!
//! The interface's shaping configuration is global, singly-owned mutable
//! state. Applying replaces whatever was installed before (last writer
//! wins); reverting when nothing is applied succeeds silently, so teardown
//! paths can revert unconditionally.

mod controller;
mod error;
mod spec;

pub use controller::{RecordingShaper, ShapeController, ShapeEvent, TcShapeController};
pub use error::ShapeApplyError;
pub use spec::{netem_args, revert_args, ShapeSpec};
