//! Error types for simulation execution.

use std::fmt;

use media::{ArtifactNameError, TransformError};
use shape::ShapeApplyError;

/// Errors from resolving or executing a simulation.
#[derive(Debug)]
pub enum SimError {
    /// The requested name is not in the registry.
    UnknownSimulation { name: String },
    /// A parameter the transform needs is absent from both the defaults
    /// and the overrides.
    MissingParameter {
        simulation: &'static str,
        parameter: &'static str,
    },
    /// The underlying transform capability failed. Propagated, not retried.
    Transform(TransformError),
    /// Installing the traffic shape failed.
    Shape(ShapeApplyError),
    /// The source path cannot produce a derived name.
    Artifact(ArtifactNameError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSimulation { name } => {
                write!(f, "unknown simulation {name:?}")
            }
            Self::MissingParameter {
                simulation,
                parameter,
            } => {
                write!(f, "simulation {simulation} is missing parameter {parameter:?}")
            }
            Self::Transform(err) => write!(f, "transform execution failed: {err}"),
            Self::Shape(err) => write!(f, "shape apply failed: {err}"),
            Self::Artifact(err) => write!(f, "artifact naming failed: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transform(err) => Some(err),
            Self::Shape(err) => Some(err),
            Self::Artifact(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransformError> for SimError {
    fn from(err: TransformError) -> Self {
        Self::Transform(err)
    }
}

impl From<ShapeApplyError> for SimError {
    fn from(err: ShapeApplyError) -> Self {
        Self::Shape(err)
    }
}

impl From<ArtifactNameError> for SimError {
    fn from(err: ArtifactNameError) -> Self {
        Self::Artifact(err)
    }
}
