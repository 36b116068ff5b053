//! Media artifact model and the derived-file naming convention.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ArtifactNameError;

/// The literal marker that separates the source basename from the
/// simulation name in derived file names.
///
/// Discovery tooling splits on this exact substring, so it is part of the
/// on-disk contract and must never change.
pub const DERIVED_MARKER: &str = "_temp_";

/// How an artifact is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A finished file on the local filesystem.
    FileOnDisk,
    /// A live stream reachable by URL.
    LiveStream,
}

/// Locator for a media artifact: a file path or a stream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Path to a file on disk.
    File(PathBuf),
    /// URL of a live stream.
    Stream(String),
}

impl Locator {
    /// Returns the artifact kind for this locator.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        match self {
            Self::File(_) => ArtifactKind::FileOnDisk,
            Self::Stream(_) => ArtifactKind::LiveStream,
        }
    }

    /// Returns the file path if this locator points at a file.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stream(_) => None,
        }
    }

    /// The string handed to external tools as an input specifier.
    #[must_use]
    pub fn as_input(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stream(url) => url.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stream(url) => f.write_str(url),
        }
    }
}

impl From<PathBuf> for Locator {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// A media artifact produced by a simulation and consumed by validations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaArtifact {
    /// Where the artifact lives.
    pub locator: Locator,
    /// The pre-degradation artifact used for comparison, when known.
    pub baseline: Option<Locator>,
}

impl MediaArtifact {
    /// Creates an artifact with no baseline reference.
    #[must_use]
    pub const fn new(locator: Locator) -> Self {
        Self {
            locator,
            baseline: None,
        }
    }

    /// Attaches a baseline reference.
    #[must_use]
    pub fn with_baseline(mut self, baseline: Locator) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Returns the artifact kind.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        self.locator.kind()
    }
}

/// The components recovered from a derived file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Basename of the source video (everything before the marker).
    pub source_stem: String,
    /// Name of the simulation that produced the file.
    pub simulation: String,
    /// File extension, without the dot. Empty if the name has none.
    pub extension: String,
}

/// Builds the derived output path for a simulation applied to `source`.
///
/// The result lives next to the source and follows
/// `<basename>_temp_<simulation>.<extension>`. The source extension is
/// preserved; a source without one yields a derived name without one.
pub fn derived_path(source: &Path, simulation: &str) -> Result<PathBuf, ArtifactNameError> {
    let stem = source
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| ArtifactNameError::NotUtf8 {
            name: source.display().to_string(),
        })?;
    let mut name = format!("{stem}{DERIVED_MARKER}{simulation}");
    if let Some(ext) = source.extension().and_then(OsStr::to_str) {
        name.push('.');
        name.push_str(ext);
    }
    Ok(source.with_file_name(name))
}

/// Recovers the source stem, simulation name, and extension from a derived
/// file name.
///
/// The name must contain the `_temp_` marker exactly once with a non-empty
/// stem before it and a non-empty simulation name after it; anything else
/// is a [`ArtifactNameError::Malformed`] and is rejected rather than
/// silently accepted.
pub fn parse_derived_name(file_name: &str) -> Result<ParsedName, ArtifactNameError> {
    let mut parts = file_name.split(DERIVED_MARKER);
    let stem = parts.next().unwrap_or_default();
    let Some(rest) = parts.next() else {
        return Err(ArtifactNameError::Malformed {
            name: file_name.to_string(),
        });
    };
    if parts.next().is_some() || stem.is_empty() {
        return Err(ArtifactNameError::Malformed {
            name: file_name.to_string(),
        });
    }

    let (simulation, extension) = match rest.rsplit_once('.') {
        Some((sim, ext)) => (sim, ext),
        None => (rest, ""),
    };
    if simulation.is_empty() {
        return Err(ArtifactNameError::Malformed {
            name: file_name.to_string(),
        });
    }

    Ok(ParsedName {
        source_stem: stem.to_string(),
        simulation: simulation.to_string(),
        extension: extension.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derived_path_keeps_directory_and_extension() {
        let path = derived_path(Path::new("/videos/match.mp4"), "packet_loss").unwrap();
        assert_eq!(path, Path::new("/videos/match_temp_packet_loss.mp4"));
    }

    #[test]
    fn derived_path_without_extension() {
        let path = derived_path(Path::new("clip"), "noise").unwrap();
        assert_eq!(path, Path::new("clip_temp_noise"));
    }

    #[test]
    fn parse_recovers_all_parts() {
        let parsed = parse_derived_name("match_temp_packet_loss.mp4").unwrap();
        assert_eq!(parsed.source_stem, "match");
        assert_eq!(parsed.simulation, "packet_loss");
        assert_eq!(parsed.extension, "mp4");
    }

    #[test]
    fn parse_without_extension() {
        let parsed = parse_derived_name("clip_temp_noise").unwrap();
        assert_eq!(parsed.simulation, "noise");
        assert_eq!(parsed.extension, "");
    }

    #[test]
    fn parse_rejects_missing_marker() {
        let err = parse_derived_name("match.mp4").unwrap_err();
        assert!(matches!(err, ArtifactNameError::Malformed { .. }));
    }

    #[test]
    fn parse_rejects_double_marker() {
        let err = parse_derived_name("a_temp_b_temp_c.mp4").unwrap_err();
        assert!(matches!(err, ArtifactNameError::Malformed { .. }));
    }

    #[test]
    fn parse_rejects_empty_stem() {
        let err = parse_derived_name("_temp_noise.mp4").unwrap_err();
        assert!(matches!(err, ArtifactNameError::Malformed { .. }));
    }

    #[test]
    fn parse_rejects_empty_simulation() {
        let err = parse_derived_name("clip_temp_.mp4").unwrap_err();
        assert!(matches!(err, ArtifactNameError::Malformed { .. }));
    }

    proptest! {
        #[test]
        fn naming_round_trips(
            stem in "[a-z][a-z0-9-]{0,16}",
            simulation in "[a-z][a-z0-9_]{0,24}",
            ext in "[a-z0-9]{1,4}",
        ) {
            // Guard against the marker landing inside (or straddling) a
            // generated part, which is malformed by contract.
            prop_assume!(
                format!("{stem}{DERIVED_MARKER}{simulation}")
                    .matches(DERIVED_MARKER)
                    .count()
                    == 1
            );

            let source = PathBuf::from(format!("{stem}.{ext}"));
            let derived = derived_path(&source, &simulation).unwrap();
            let name = derived.file_name().unwrap().to_str().unwrap();
            let parsed = parse_derived_name(name).unwrap();
            prop_assert_eq!(parsed.source_stem, stem);
            prop_assert_eq!(parsed.simulation, simulation);
            prop_assert_eq!(parsed.extension, ext);
        }
    }

    #[test]
    fn locator_kinds() {
        let file = Locator::File(PathBuf::from("a.mp4"));
        let stream = Locator::Stream("rtsp://host:8554/a".to_string());
        assert_eq!(file.kind(), ArtifactKind::FileOnDisk);
        assert_eq!(stream.kind(), ArtifactKind::LiveStream);
        assert!(file.as_path().is_some());
        assert!(stream.as_path().is_none());
    }

    #[test]
    fn artifact_with_baseline() {
        let artifact = MediaArtifact::new(Locator::File(PathBuf::from("out.mp4")))
            .with_baseline(Locator::File(PathBuf::from("in.mp4")));
        assert_eq!(artifact.kind(), ArtifactKind::FileOnDisk);
        assert!(artifact.baseline.is_some());
    }
}
