//! Inputs and capabilities a suite run sees.

use std::path::PathBuf;

use media::{FrameSource, Locator, MediaArtifact, Prober, Scorer};

use crate::config::ValidationConfig;

/// The capability surface checks measure through.
#[derive(Clone, Copy)]
pub struct Capabilities<'a> {
    /// Stream property extraction.
    pub prober: &'a dyn Prober,
    /// Frame-by-frame decoding.
    pub frames: &'a dyn FrameSource,
    /// Perceptual scoring.
    pub scorer: &'a dyn Scorer,
}

/// A paired original/simulated log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPair {
    /// Log captured against the undegraded stream.
    pub original: PathBuf,
    /// Log captured against the degraded artifact.
    pub simulated: PathBuf,
}

/// Auxiliary inputs supplied alongside the artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxInputs {
    /// Paired OCR logs, when scoreboard recognition ran.
    pub ocr_logs: Option<LogPair>,
    /// Paired error logs.
    pub error_logs: Option<LogPair>,
    /// Reference overlay image expected to survive degradation.
    pub overlay: Option<Locator>,
}

/// Everything a check body can see.
pub struct CheckContext<'a> {
    /// The capability surface.
    pub caps: Capabilities<'a>,
    /// Threshold configuration.
    pub config: &'a ValidationConfig,
    /// The artifact under validation, baseline attached when known.
    pub artifact: &'a MediaArtifact,
    /// Auxiliary inputs.
    pub aux: &'a AuxInputs,
}

impl CheckContext<'_> {
    /// The baseline locator, when the artifact carries one.
    #[must_use]
    pub fn baseline(&self) -> Option<&Locator> {
        self.artifact.baseline.as_ref()
    }
}
