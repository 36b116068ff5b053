//! Error type for check bodies.

use std::fmt;
use std::io;

use media::{ProbeError, ScoreError};

/// Why a check body could not run to completion.
///
/// The runner converts this into an `Errored` outcome; it never crosses
/// the runner boundary as an error.
#[derive(Debug)]
pub enum CheckError {
    /// The prober or frame source produced no usable data.
    Probe(ProbeError),
    /// The perceptual scorer produced no usable data.
    Score(ScoreError),
    /// Reading an auxiliary input failed.
    Io(io::Error),
    /// The check's inputs are structurally unusable (wrong artifact kind,
    /// zero decoded frames, missing metadata).
    Invalid { reason: String },
}

impl CheckError {
    /// Constructs an [`CheckError::Invalid`] from anything displayable.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe(err) => write!(f, "probe failed: {err}"),
            Self::Score(err) => write!(f, "scoring failed: {err}"),
            Self::Io(err) => write!(f, "io failed: {err}"),
            Self::Invalid { reason } => write!(f, "invalid input: {reason}"),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Probe(err) => Some(err),
            Self::Score(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<ProbeError> for CheckError {
    fn from(err: ProbeError) -> Self {
        Self::Probe(err)
    }
}

impl From<ScoreError> for CheckError {
    fn from(err: ScoreError) -> Self {
        Self::Score(err)
    }
}

impl From<io::Error> for CheckError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
