//! Degradation simulations for the vstress harness.
//!
//! A simulation is a named transform that degrades a video source in a
//! controlled way. This crate owns the typed registry of simulations, the
//! per-run context that carries mutable state (escalation counters, temp
//! artifacts, traffic-shape ownership), and the executor that resolves a
//! requested name and dispatches it.
//!
//! Two execution modes exist:
//!
//! - **Pipeline descriptor**: the transform builds a declarative launch
//!   string for an external media server and touches nothing else (except
//!   network simulations, which install a traffic shape first).
//! - **File transform**: the transform materializes a derived file named
//!   `<basename>_temp_<simulation>.<ext>` through the transformer
//!   capability.
//!
//! # Design Principles
//!
//! - **Explicit registry** - The set of available simulations is a value,
//!   not a reflection walk; it is inspectable and independently testable.
//! - **Context-owned state** - Escalation counters and temp files live on
//!   [`RunContext`], never in process globals, so repeated runs in one
//!   process do not leak into each other.
//! - **Teardown always reverts** - Every teardown path (normal, error,
//!   drop) attempts a traffic-shape revert and deletes temp artifacts.

mod camera;
mod context;
mod error;
mod executor;
mod hardware;
mod network;
mod params;
pub mod pipeline;
mod registry;

pub use context::RunContext;
pub use error::SimError;
pub use executor::{execute, SimRun};
pub use params::SimParams;
pub use registry::{
    ExecutionMode, SimCategory, SimFn, SimOutput, SimulationRegistry, SimulationSpec,
};
