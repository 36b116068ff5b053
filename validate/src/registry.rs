//! Typed check registry.

use std::fmt;

use crate::checks;
use crate::context::CheckContext;
use crate::error::CheckError;

/// An input a check cannot run without.
///
/// The original/simulated log files always travel as pairs — a positional
/// similarity needs both sides — so the two log kinds are modeled as
/// paired inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// The artifact under validation. Always present.
    Artifact,
    /// The pre-degradation artifact.
    Baseline,
    /// Paired original/simulated OCR logs.
    OcrLogPair,
    /// Paired original/simulated error logs.
    ErrorLogPair,
    /// The reference overlay image.
    OverlayImage,
}

impl InputKind {
    /// The label used in skip messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Artifact => "artifact",
            Self::Baseline => "baseline",
            Self::OcrLogPair => "ocr log pair",
            Self::ErrorLogPair => "error log pair",
            Self::OverlayImage => "overlay image",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a completed check body reports back to the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Whether the measured value met the threshold.
    pub passed: bool,
    /// The measured value, when one exists.
    pub measured: Option<f64>,
    /// Threshold comparison detail for the report.
    pub message: String,
}

impl CheckResult {
    /// A passing result.
    #[must_use]
    pub fn pass(measured: Option<f64>, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            measured,
            message: message.into(),
        }
    }

    /// A failing result.
    #[must_use]
    pub fn fail(measured: Option<f64>, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            measured,
            message: message.into(),
        }
    }
}

/// A check body.
pub type CheckFn = fn(&CheckContext<'_>) -> Result<CheckResult, CheckError>;

/// A skip predicate: `Some(reason)` skips the check.
pub type SkipFn = fn(&CheckContext<'_>) -> Option<String>;

fn never_skip(_ctx: &CheckContext<'_>) -> Option<String> {
    None
}

/// One registered check.
pub struct ValidationCheck {
    /// Unique registry key.
    pub name: &'static str,
    /// Inputs the runner must see before dispatching the body.
    pub requires: &'static [InputKind],
    /// Evaluated against the context before the body runs.
    pub skip: SkipFn,
    /// The check body.
    pub run: CheckFn,
}

impl ValidationCheck {
    /// The first required input absent from `ctx`, if any.
    #[must_use]
    pub fn missing_input(&self, ctx: &CheckContext<'_>) -> Option<InputKind> {
        self.requires.iter().copied().find(|kind| match kind {
            InputKind::Artifact => false,
            InputKind::Baseline => ctx.artifact.baseline.is_none(),
            InputKind::OcrLogPair => ctx.aux.ocr_logs.is_none(),
            InputKind::ErrorLogPair => ctx.aux.error_logs.is_none(),
            InputKind::OverlayImage => ctx.aux.overlay.is_none(),
        })
    }
}

impl fmt::Debug for ValidationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationCheck")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// A suite selection referenced a name that is not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCheck {
    /// The unrecognized name.
    pub name: String,
}

impl fmt::Display for UnknownCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown validation check {:?}", self.name)
    }
}

impl std::error::Error for UnknownCheck {}

/// The set of available checks, in declaration order.
///
/// Execution order is registration order — defined once, stable across
/// runs, never alphabetical — so cheap sanity gates sit ahead of the
/// expensive perceptual scoring and reports diff cleanly between runs.
#[derive(Debug, Default)]
pub struct ValidationRegistry {
    entries: Vec<ValidationCheck>,
}

impl ValidationRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check. Re-registering a name overwrites the previous
    /// entry in place.
    pub fn register(&mut self, check: ValidationCheck) {
        match self.entries.iter().position(|e| e.name == check.name) {
            Some(idx) => self.entries[idx] = check,
            None => self.entries.push(check),
        }
    }

    /// Looks up a check by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ValidationCheck> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All checks, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.entries.iter()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a subset of checks by name, returned in registration
    /// order regardless of the order names were given in.
    pub fn select(&self, names: &[&str]) -> Result<Vec<&ValidationCheck>, UnknownCheck> {
        for name in names {
            if self.get(name).is_none() {
                return Err(UnknownCheck {
                    name: (*name).to_string(),
                });
            }
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| names.contains(&e.name))
            .collect())
    }

    /// The full built-in check set.
    ///
    /// Declaration order is the execution order: stream-property gates,
    /// then the identity and duration gates, frame statistics, log
    /// similarity, overlay presence, and the perceptual score last.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ValidationCheck {
            name: "resolution",
            requires: &[InputKind::Artifact],
            skip: never_skip,
            run: checks::stream::resolution,
        });
        registry.register(ValidationCheck {
            name: "frame_rate",
            requires: &[InputKind::Artifact],
            skip: never_skip,
            run: checks::stream::frame_rate,
        });
        registry.register(ValidationCheck {
            name: "bitrate",
            requires: &[InputKind::Artifact],
            skip: never_skip,
            run: checks::stream::bitrate,
        });
        registry.register(ValidationCheck {
            name: "codec",
            requires: &[InputKind::Artifact],
            skip: never_skip,
            run: checks::stream::codec,
        });
        registry.register(ValidationCheck {
            name: "keyframe_interval",
            requires: &[InputKind::Artifact],
            skip: never_skip,
            run: checks::stream::keyframe_interval,
        });
        registry.register(ValidationCheck {
            name: "audio_codec",
            requires: &[InputKind::Artifact],
            skip: checks::stream::skip_without_audio,
            run: checks::stream::audio_codec,
        });
        registry.register(ValidationCheck {
            name: "video_not_same",
            requires: &[InputKind::Artifact],
            skip: never_skip,
            run: checks::identity::video_not_same,
        });
        registry.register(ValidationCheck {
            name: "duration_match",
            requires: &[InputKind::Artifact, InputKind::Baseline],
            skip: never_skip,
            run: checks::identity::duration_match,
        });
        registry.register(ValidationCheck {
            name: "brightness_shift",
            requires: &[InputKind::Artifact, InputKind::Baseline],
            skip: never_skip,
            run: checks::frames::brightness_shift,
        });
        registry.register(ValidationCheck {
            name: "contrast_shift",
            requires: &[InputKind::Artifact, InputKind::Baseline],
            skip: never_skip,
            run: checks::frames::contrast_shift,
        });
        registry.register(ValidationCheck {
            name: "blur_shift",
            requires: &[InputKind::Artifact, InputKind::Baseline],
            skip: never_skip,
            run: checks::frames::blur_shift,
        });
        registry.register(ValidationCheck {
            name: "noise_shift",
            requires: &[InputKind::Artifact, InputKind::Baseline],
            skip: never_skip,
            run: checks::frames::noise_shift,
        });
        registry.register(ValidationCheck {
            name: "horizontal_drift_shift",
            requires: &[InputKind::Artifact, InputKind::Baseline],
            skip: never_skip,
            run: checks::frames::horizontal_drift_shift,
        });
        registry.register(ValidationCheck {
            name: "ocr_similarity",
            requires: &[InputKind::OcrLogPair],
            skip: never_skip,
            run: checks::logs::ocr_similarity,
        });
        registry.register(ValidationCheck {
            name: "error_log_similarity",
            requires: &[InputKind::ErrorLogPair],
            skip: never_skip,
            run: checks::logs::error_log_similarity,
        });
        registry.register(ValidationCheck {
            name: "overlay_present",
            requires: &[InputKind::Artifact, InputKind::OverlayImage],
            skip: never_skip,
            run: checks::overlay::overlay_present,
        });
        registry.register(ValidationCheck {
            name: "perceptual_quality",
            requires: &[InputKind::Artifact, InputKind::Baseline],
            skip: checks::perceptual::skip_when_disabled,
            run: checks::perceptual::perceptual_quality,
        });
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_is_declaration_order() {
        let registry = ValidationRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "resolution",
                "frame_rate",
                "bitrate",
                "codec",
                "keyframe_interval",
                "audio_codec",
                "video_not_same",
                "duration_match",
                "brightness_shift",
                "contrast_shift",
                "blur_shift",
                "noise_shift",
                "horizontal_drift_shift",
                "ocr_similarity",
                "error_log_similarity",
                "overlay_present",
                "perceptual_quality",
            ]
        );
    }

    #[test]
    fn select_preserves_registration_order() {
        let registry = ValidationRegistry::builtin();
        let selected = registry
            .select(&["perceptual_quality", "resolution", "video_not_same"])
            .unwrap();
        let names: Vec<_> = selected.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["resolution", "video_not_same", "perceptual_quality"]);
    }

    #[test]
    fn select_rejects_unknown_names() {
        let registry = ValidationRegistry::builtin();
        let err = registry.select(&["resolution", "vibes"]).unwrap_err();
        assert_eq!(err.name, "vibes");
    }
}
