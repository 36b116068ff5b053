//! Media transform capability.

use std::path::Path;
use std::process::Command;

use crate::error::TransformError;

/// A declarative description of a file-to-file media transform.
///
/// This is the whole vocabulary file-transform simulations need: an
/// optional video filter graph, optional video codec arguments, and
/// whether the audio stream is copied or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    /// `-vf` filter graph, e.g. `eq=brightness=0.35`.
    pub video_filter: Option<String>,
    /// Extra output arguments, e.g. `["-b:v", "50k"]` or `["-crf", "45"]`.
    pub output_args: Vec<String>,
    /// Drop the audio stream instead of copying it.
    pub strip_audio: bool,
}

impl FilterSpec {
    /// A spec that only applies a video filter graph.
    #[must_use]
    pub fn video_filter(filter: impl Into<String>) -> Self {
        Self {
            video_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    /// Appends output arguments.
    #[must_use]
    pub fn with_output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Capability that materializes a transformed copy of a media file.
pub trait Transformer {
    /// Applies `spec` to `input`, writing the result to `output`.
    fn apply(&self, input: &Path, output: &Path, spec: &FilterSpec) -> Result<(), TransformError>;
}

/// ffmpeg-backed transformer.
#[derive(Debug, Clone)]
pub struct FfmpegTransformer {
    binary: String,
}

impl Default for FfmpegTransformer {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegTransformer {
    /// Uses a specific ffmpeg binary instead of the one on `PATH`.
    #[must_use]
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Builds the ffmpeg argument vector for a transform invocation.
///
/// Split out of [`FfmpegTransformer::apply`] so command construction is
/// testable without running ffmpeg.
#[must_use]
pub fn ffmpeg_args(input: &Path, output: &Path, spec: &FilterSpec) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-i".to_string(),
        input.display().to_string(),
    ];
    if let Some(filter) = &spec.video_filter {
        args.push("-vf".to_string());
        args.push(filter.clone());
    }
    args.extend(spec.output_args.iter().cloned());
    if spec.strip_audio {
        args.push("-an".to_string());
    } else {
        args.push("-c:a".to_string());
        args.push("copy".to_string());
    }
    args.push(output.display().to_string());
    args
}

impl Transformer for FfmpegTransformer {
    fn apply(&self, input: &Path, output: &Path, spec: &FilterSpec) -> Result<(), TransformError> {
        let args = ffmpeg_args(input, output, spec);
        let result = Command::new(&self.binary).args(&args).output()?;
        if !result.status.success() {
            return Err(TransformError::CommandFailed {
                status: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }
        if !output.is_file() {
            return Err(TransformError::MissingOutput {
                path: output.display().to_string(),
            });
        }
        Ok(())
    }
}
