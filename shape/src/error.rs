//! Error types for shape application.

use std::fmt;
use std::io;

/// Errors from applying a traffic shape.
///
/// Reverting has no error type on purpose: revert is best-effort and must
/// never fail its caller.
#[derive(Debug)]
pub enum ShapeApplyError {
    /// The shaping tool could not be spawned.
    Io(io::Error),
    /// The shaping tool exited unsuccessfully.
    CommandFailed {
        status: Option<i32>,
        stderr: String,
    },
}

impl fmt::Display for ShapeApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "shaping io error: {err}"),
            Self::CommandFailed { status, stderr } => {
                let stderr = stderr.trim();
                match status {
                    Some(code) => write!(f, "tc exited with status {code}: {stderr}"),
                    None => write!(f, "tc terminated by signal: {stderr}"),
                }
            }
        }
    }
}

impl std::error::Error for ShapeApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::CommandFailed { .. } => None,
        }
    }
}

impl From<io::Error> for ShapeApplyError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
