//! Perceptual-quality scoring capability.
//!
//! Frame-pair comparison is delegated entirely to ffmpeg's `psnr`/`libvmaf`
//! filters after normalizing both inputs to a common pixel format; this
//! module only owns command construction and aggregate-score parsing.

use std::process::Command;

use crate::artifact::Locator;
use crate::error::ScoreError;

/// Which perceptual metric the scorer computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerceptualMetric {
    /// Peak signal-to-noise ratio.
    Psnr,
    /// Video Multimethod Assessment Fusion.
    Vmaf,
}

impl PerceptualMetric {
    /// The metric label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Psnr => "psnr",
            Self::Vmaf => "vmaf",
        }
    }
}

/// Capability that compares a degraded artifact against its baseline and
/// returns one aggregate score.
pub trait Scorer {
    /// Scores `artifact` against `baseline`. Higher is better for both
    /// supported metrics.
    fn score(&self, baseline: &Locator, artifact: &Locator) -> Result<f64, ScoreError>;

    /// The metric this scorer computes.
    fn metric(&self) -> PerceptualMetric;
}

/// ffmpeg-backed scorer.
#[derive(Debug, Clone)]
pub struct FfmpegScorer {
    binary: String,
    metric: PerceptualMetric,
}

impl FfmpegScorer {
    /// Creates a scorer for the given metric using `ffmpeg` from `PATH`.
    #[must_use]
    pub fn new(metric: PerceptualMetric) -> Self {
        Self {
            binary: "ffmpeg".to_string(),
            metric,
        }
    }

    /// Uses a specific ffmpeg binary instead of the one on `PATH`.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

/// Builds the ffmpeg argument vector for a scoring invocation.
///
/// Both inputs are normalized to `yuv420p` before comparison so that
/// pixel-format drift introduced by a simulation does not fail the filter.
#[must_use]
pub fn scorer_args(metric: PerceptualMetric, baseline: &Locator, artifact: &Locator) -> Vec<String> {
    let graph = match metric {
        PerceptualMetric::Psnr => {
            "[0:v]format=yuv420p[ref];[1:v]format=yuv420p[dis];[dis][ref]psnr"
        }
        PerceptualMetric::Vmaf => {
            "[0:v]format=yuv420p[ref];[1:v]format=yuv420p[dis];[dis][ref]libvmaf"
        }
    };
    vec![
        "-i".to_string(),
        baseline.as_input(),
        "-i".to_string(),
        artifact.as_input(),
        "-lavfi".to_string(),
        graph.to_string(),
        "-f".to_string(),
        "null".to_string(),
        "-".to_string(),
    ]
}

impl Scorer for FfmpegScorer {
    fn score(&self, baseline: &Locator, artifact: &Locator) -> Result<f64, ScoreError> {
        let args = scorer_args(self.metric, baseline, artifact);
        let output = Command::new(&self.binary).args(&args).output()?;
        if !output.status.success() {
            return Err(ScoreError::CommandFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        // Both filters report their aggregate on stderr.
        let stderr = String::from_utf8_lossy(&output.stderr);
        let parsed = match self.metric {
            PerceptualMetric::Psnr => parse_psnr_average(&stderr),
            PerceptualMetric::Vmaf => parse_vmaf_score(&stderr),
        };
        parsed.ok_or(ScoreError::NoScore {
            metric: self.metric.label(),
        })
    }

    fn metric(&self) -> PerceptualMetric {
        self.metric
    }
}

/// Extracts the `average:` value from ffmpeg `psnr` filter output.
#[must_use]
pub fn parse_psnr_average(output: &str) -> Option<f64> {
    for line in output.lines() {
        if let Some(rest) = line.split("average:").nth(1) {
            let token = rest.split_whitespace().next()?;
            if token == "inf" {
                return Some(f64::INFINITY);
            }
            return token.parse().ok();
        }
    }
    None
}

/// Extracts the `VMAF score:` value from ffmpeg `libvmaf` filter output.
#[must_use]
pub fn parse_vmaf_score(output: &str) -> Option<f64> {
    for line in output.lines() {
        if let Some(rest) = line.split("VMAF score:").nth(1) {
            return rest.trim().split_whitespace().next()?.parse().ok();
        }
    }
    None
}
