//! In-memory capability implementations for orchestration tests.
//!
//! These mirror the production capabilities closely enough to exercise the
//! registries, the runner, and the report pipeline without media binaries
//! installed. They live in the library (rather than behind `cfg(test)`)
//! because the sim, validate, and cli crates all drive their tests with
//! them.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::artifact::Locator;
use crate::error::{ProbeError, ScoreError, TransformError};
use crate::frame::GrayFrame;
use crate::probe::{FrameKind, Prober, StreamProperties};
use crate::score::{PerceptualMetric, Scorer};
use crate::source::{FramePlane, FrameRead, FrameSource};
use crate::transform::{FilterSpec, Transformer};

/// A prober that serves canned properties.
#[derive(Debug, Clone)]
pub struct MockProber {
    properties: StreamProperties,
    per_input: HashMap<String, StreamProperties>,
    kinds: Vec<FrameKind>,
    fail: bool,
}

impl MockProber {
    /// Serves the given properties for every input.
    #[must_use]
    pub fn new(properties: StreamProperties) -> Self {
        Self {
            properties,
            per_input: HashMap::new(),
            kinds: Vec::new(),
            fail: false,
        }
    }

    /// Baseline 1080p properties useful as a starting point in tests.
    #[must_use]
    pub fn hd() -> Self {
        Self::new(StreamProperties {
            width: 1920,
            height: 1080,
            fps: 30.0,
            bitrate_bps: Some(4_000_000),
            codec: "h264".to_string(),
            frame_count: Some(300),
            has_audio: true,
            audio_codec: Some("aac".to_string()),
        })
    }

    /// Serves distinct properties for a specific input string.
    #[must_use]
    pub fn with_input_properties(
        mut self,
        input: impl Into<String>,
        properties: StreamProperties,
    ) -> Self {
        self.per_input.insert(input.into(), properties);
        self
    }

    /// Sets the frame-kind sequence served by [`Prober::frame_kinds`].
    #[must_use]
    pub fn with_frame_kinds(mut self, kinds: Vec<FrameKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Makes every probe call fail, for error-isolation tests.
    #[must_use]
    pub fn unavailable() -> Self {
        let mut prober = Self::hd();
        prober.fail = true;
        prober
    }

    /// Mutates the served properties.
    pub fn set_properties(&mut self, properties: StreamProperties) {
        self.properties = properties;
    }
}

impl Prober for MockProber {
    fn properties(&self, input: &Locator) -> Result<StreamProperties, ProbeError> {
        if self.fail {
            return Err(ProbeError::Unparsable {
                reason: "mock prober configured unavailable".to_string(),
            });
        }
        Ok(self
            .per_input
            .get(&input.as_input())
            .unwrap_or(&self.properties)
            .clone())
    }

    fn frame_kinds(&self, _input: &Locator) -> Result<Vec<FrameKind>, ProbeError> {
        if self.fail {
            return Err(ProbeError::Unparsable {
                reason: "mock prober configured unavailable".to_string(),
            });
        }
        Ok(self.kinds.clone())
    }
}

/// A frame source that serves synthetic frames from memory.
#[derive(Debug, Default)]
pub struct SyntheticSource {
    default_frames: Vec<GrayFrame>,
    per_input: HashMap<String, Vec<GrayFrame>>,
    alpha: Option<Vec<GrayFrame>>,
    opens: AtomicUsize,
}

impl SyntheticSource {
    /// Serves `frames` for every input.
    #[must_use]
    pub fn new(default_frames: Vec<GrayFrame>) -> Self {
        Self {
            default_frames,
            ..Self::default()
        }
    }

    /// Serves `frames` for the specific input string (path or URL).
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>, frames: Vec<GrayFrame>) -> Self {
        self.per_input.insert(input.into(), frames);
        self
    }

    /// Serves `frames` when the alpha plane is opened.
    #[must_use]
    pub fn with_alpha(mut self, frames: Vec<GrayFrame>) -> Self {
        self.alpha = Some(frames);
        self
    }

    /// Number of times any plane was opened. Lets tests assert that a
    /// check short-circuited before decoding.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }
}

impl FrameSource for SyntheticSource {
    fn open_plane(
        &self,
        input: &Locator,
        plane: FramePlane,
    ) -> Result<Box<dyn FrameRead>, ProbeError> {
        self.opens.fetch_add(1, Ordering::Relaxed);
        let frames = match plane {
            FramePlane::Luma => self
                .per_input
                .get(&input.as_input())
                .unwrap_or(&self.default_frames)
                .clone(),
            FramePlane::Alpha => self
                .alpha
                .clone()
                .ok_or(ProbeError::NoVideoStream)?,
        };
        Ok(Box::new(VecFrameRead {
            frames: frames.into(),
        }))
    }
}

struct VecFrameRead {
    frames: VecDeque<GrayFrame>,
}

impl FrameRead for VecFrameRead {
    fn next_frame(&mut self) -> Result<Option<GrayFrame>, ProbeError> {
        Ok(self.frames.pop_front())
    }
}

/// A transformer that copies the input file and records every call.
#[derive(Debug, Default)]
pub struct MockTransformer {
    calls: Mutex<Vec<FilterSpec>>,
    fail: bool,
}

impl MockTransformer {
    /// A transformer whose every call succeeds by copying the input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transformer whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// The specs this transformer was invoked with, in call order.
    #[must_use]
    pub fn applied(&self) -> Vec<FilterSpec> {
        self.calls.lock().expect("mock transformer lock").clone()
    }
}

impl Transformer for MockTransformer {
    fn apply(&self, input: &Path, output: &Path, spec: &FilterSpec) -> Result<(), TransformError> {
        if self.fail {
            return Err(TransformError::CommandFailed {
                status: Some(1),
                stderr: "mock transformer configured to fail".to_string(),
            });
        }
        self.calls
            .lock()
            .expect("mock transformer lock")
            .push(spec.clone());
        fs::copy(input, output)?;
        Ok(())
    }
}

/// A scorer that returns a fixed aggregate.
#[derive(Debug, Clone)]
pub struct MockScorer {
    score: Option<f64>,
    metric: PerceptualMetric,
}

impl MockScorer {
    /// Always returns `score`.
    #[must_use]
    pub const fn new(score: f64) -> Self {
        Self {
            score: Some(score),
            metric: PerceptualMetric::Vmaf,
        }
    }

    /// Always fails with [`ScoreError::NoScore`].
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            score: None,
            metric: PerceptualMetric::Vmaf,
        }
    }
}

impl Scorer for MockScorer {
    fn score(&self, _baseline: &Locator, _artifact: &Locator) -> Result<f64, ScoreError> {
        self.score.ok_or(ScoreError::NoScore {
            metric: self.metric.label(),
        })
    }

    fn metric(&self) -> PerceptualMetric {
        self.metric
    }
}
