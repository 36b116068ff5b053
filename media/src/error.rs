//! Error types for the media capability surface.

use std::fmt;
use std::io;

/// Errors from the derived-file naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactNameError {
    /// The file name does not follow `<basename>_temp_<simulation>.<ext>`.
    Malformed { name: String },
    /// The path is not valid UTF-8 and cannot participate in the convention.
    NotUtf8 { name: String },
}

impl fmt::Display for ArtifactNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { name } => {
                write!(f, "file name {name:?} is not in <basename>_temp_<simulation> form")
            }
            Self::NotUtf8 { name } => write!(f, "path {name:?} is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ArtifactNameError {}

/// Errors from frame container construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Pixel buffer length does not match width * height.
    SizeMismatch { expected: usize, actual: usize },
    /// A zero dimension was supplied.
    EmptyDimensions { width: usize, height: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "frame buffer has {actual} bytes, expected {expected}")
            }
            Self::EmptyDimensions { width, height } => {
                write!(f, "frame dimensions {width}x{height} are empty")
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// Errors from the stream prober capability.
#[derive(Debug)]
pub enum ProbeError {
    /// The probe process could not be spawned or its output read.
    Io(io::Error),
    /// The probe process exited unsuccessfully.
    CommandFailed {
        status: Option<i32>,
        stderr: String,
    },
    /// The probe produced output the parser could not interpret.
    Unparsable { reason: String },
    /// The input has no video stream to probe.
    NoVideoStream,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "probe io error: {err}"),
            Self::CommandFailed { status, stderr } => {
                let stderr = stderr.trim();
                match status {
                    Some(code) => write!(f, "probe exited with status {code}: {stderr}"),
                    None => write!(f, "probe terminated by signal: {stderr}"),
                }
            }
            Self::Unparsable { reason } => write!(f, "unparsable probe output: {reason}"),
            Self::NoVideoStream => write!(f, "input has no video stream"),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Errors from the media transform capability.
#[derive(Debug)]
pub enum TransformError {
    /// The transform process could not be spawned or its output read.
    Io(io::Error),
    /// The transform process exited unsuccessfully.
    CommandFailed {
        status: Option<i32>,
        stderr: String,
    },
    /// The transform finished but did not produce the expected output file.
    MissingOutput { path: String },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "transform io error: {err}"),
            Self::CommandFailed { status, stderr } => {
                let stderr = stderr.trim();
                match status {
                    Some(code) => write!(f, "transform exited with status {code}: {stderr}"),
                    None => write!(f, "transform terminated by signal: {stderr}"),
                }
            }
            Self::MissingOutput { path } => {
                write!(f, "transform produced no output at {path}")
            }
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TransformError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Errors from the perceptual-quality scorer capability.
#[derive(Debug)]
pub enum ScoreError {
    /// The scorer process could not be spawned or its output read.
    Io(io::Error),
    /// The scorer process exited unsuccessfully.
    CommandFailed {
        status: Option<i32>,
        stderr: String,
    },
    /// The scorer ran but no aggregate score could be recovered.
    NoScore { metric: &'static str },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "scorer io error: {err}"),
            Self::CommandFailed { status, stderr } => {
                let stderr = stderr.trim();
                match status {
                    Some(code) => write!(f, "scorer exited with status {code}: {stderr}"),
                    None => write!(f, "scorer terminated by signal: {stderr}"),
                }
            }
            Self::NoScore { metric } => {
                write!(f, "no {metric} score found in scorer output")
            }
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ScoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
