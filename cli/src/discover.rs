//! Video discovery and targeted suite selection.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::Pattern;

/// Extensions accepted as video sources.
const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "avi", "mkv"];

/// Collects the video files under `folder`, optionally filtered by a glob
/// pattern, sorted by path for deterministic processing order.
pub fn discover_videos(folder: &Path, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = pattern
        .map(Pattern::new)
        .transpose()
        .context("invalid glob pattern")?;

    let mut videos = Vec::new();
    for entry in
        fs::read_dir(folder).with_context(|| format!("read video folder {}", folder.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !has_video_extension(&path) {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !pattern.matches_path(&path) && !matches_name {
                continue;
            }
        }
        videos.push(path);
    }

    if videos.is_empty() {
        bail!(
            "video folder {} contains no video files ({})",
            folder.display(),
            VIDEO_EXTENSIONS.join("/")
        );
    }
    videos.sort();
    Ok(videos)
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_lowercase();
            VIDEO_EXTENSIONS.contains(&lower.as_str())
        })
}

/// The checks a simulation's artifact is dispatched to, recovered from the
/// parsed `_temp_` name.
///
/// Unrecognized simulation names get no targeted checks; the universal
/// identity and duration gates are appended by the caller either way.
pub fn targeted_checks(simulation: &str) -> Vec<&'static str> {
    match simulation {
        "brightness" | "dynamic_brightness" => vec!["brightness_shift"],
        "contrast" | "dynamic_contrast" => vec!["contrast_shift"],
        "simple_blur" | "complex_blur" => vec!["blur_shift"],
        "noise" => vec!["noise_shift"],
        "horizontal_drift" => vec!["horizontal_drift_shift"],
        "low_resolution" => vec!["resolution"],
        "compression_artifacts" => vec!["perceptual_quality"],
        "low_bitrate" => vec!["bitrate"],
        "packet_loss" | "delay" | "bandwidth_limit" | "corruption" | "duplication"
        | "reordering" => vec!["frame_rate", "perceptual_quality"],
        "hardware_failure" => vec!["brightness_shift"],
        "camera_array_delay" => vec!["frame_rate"],
        _ => Vec::new(),
    }
}

/// The universal gates appended to every targeted suite.
pub const UNIVERSAL_CHECKS: [&str; 2] = ["video_not_same", "duration_match"];
