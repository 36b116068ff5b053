//! Threshold configuration for the built-in checks.

/// Numeric bounds and toggles the built-in checks compare against.
///
/// Frame-statistic thresholds are *significance* bounds: those checks
/// assert the simulation changed something, so they pass only when the
/// baseline/artifact difference strictly exceeds the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Minimum acceptable video width in pixels.
    pub min_width: u32,
    /// Minimum acceptable video height in pixels.
    pub min_height: u32,
    /// Minimum acceptable frame rate.
    pub min_fps: f64,
    /// Minimum acceptable bitrate in bits per second.
    pub min_bitrate_bps: u64,
    /// Maximum acceptable gap between successive keyframes, in frames.
    pub max_keyframe_gap: u64,
    /// Expected video codec name.
    pub expected_codec: String,
    /// Expected audio codec name, for artifacts that carry audio.
    pub expected_audio_codec: String,
    /// Minimum significant mean-luma difference.
    pub brightness_threshold: f64,
    /// Minimum significant luma standard-deviation difference.
    pub contrast_threshold: f64,
    /// Minimum significant Laplacian-variance difference for blur.
    pub blur_threshold: f64,
    /// Minimum significant Laplacian-variance difference for noise.
    pub noise_threshold: f64,
    /// Minimum significant column-profile difference for drift.
    pub drift_threshold: f64,
    /// Frames sampled per side for frame-statistic checks.
    pub stat_frame_cap: usize,
    /// Frames sampled per side for the drift check.
    pub drift_frame_cap: usize,
    /// Minimum acceptable log similarity.
    pub similarity_threshold: f64,
    /// Minimum normalized correlation for an overlay match.
    pub overlay_correlation: f64,
    /// Consecutive sampled-frame matches required before the overlay
    /// counts as present.
    pub overlay_consecutive: usize,
    /// Sample every Nth frame when looking for the overlay.
    pub overlay_stride: usize,
    /// Minimum acceptable perceptual score.
    pub min_perceptual_score: f64,
    /// Whether the perceptual check runs at all.
    pub perceptual_enabled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_width: 1280,
            min_height: 720,
            min_fps: 20.0,
            min_bitrate_bps: 500_000,
            max_keyframe_gap: 250,
            expected_codec: "h264".to_string(),
            expected_audio_codec: "aac".to_string(),
            brightness_threshold: 10.0,
            contrast_threshold: 5.0,
            blur_threshold: 10.0,
            noise_threshold: 10.0,
            drift_threshold: 5.0,
            stat_frame_cap: 30,
            drift_frame_cap: 100,
            similarity_threshold: 0.95,
            overlay_correlation: 0.8,
            overlay_consecutive: 3,
            overlay_stride: 5,
            min_perceptual_score: 30.0,
            perceptual_enabled: true,
        }
    }
}

impl ValidationConfig {
    /// A configuration with tiny sample caps, for tests that hand-build
    /// frame sequences.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            stat_frame_cap: 4,
            drift_frame_cap: 4,
            overlay_stride: 1,
            overlay_consecutive: 2,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_match_contract() {
        let config = ValidationConfig::default();
        assert_eq!(config.brightness_threshold, 10.0);
        assert_eq!(config.contrast_threshold, 5.0);
        assert_eq!(config.drift_threshold, 5.0);
        assert_eq!(config.similarity_threshold, 0.95);
        assert_eq!(config.stat_frame_cap, 30);
        assert_eq!(config.drift_frame_cap, 100);
    }

    #[test]
    fn testing_config_shrinks_sampling() {
        let config = ValidationConfig::for_testing();
        assert!(config.stat_frame_cap < ValidationConfig::default().stat_frame_cap);
    }
}
