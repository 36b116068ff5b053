//! Stream property probing.
//!
//! The production prober shells out to ffprobe and parses its JSON output;
//! the parsers are pure functions so they are testable without ffprobe
//! installed.

use std::process::Command;

use serde::Deserialize;

use crate::artifact::Locator;
use crate::error::ProbeError;

/// Properties extracted from a media stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamProperties {
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Average frame rate.
    pub fps: f64,
    /// Overall bitrate in bits per second, when the container reports one.
    pub bitrate_bps: Option<u64>,
    /// Video codec name (e.g. `h264`).
    pub codec: String,
    /// Total decoded frame count, when the container reports one.
    pub frame_count: Option<u64>,
    /// Whether the input carries at least one audio stream.
    pub has_audio: bool,
    /// Codec of the first audio stream, if any.
    pub audio_codec: Option<String>,
}

/// Whether a decoded frame is a keyframe or a predicted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Self-contained frame (I-frame).
    Key,
    /// Frame predicted from earlier data (P/B).
    Delta,
}

/// Capability that extracts stream properties without decoding pixels.
pub trait Prober {
    /// Probes container and stream-level properties.
    fn properties(&self, input: &Locator) -> Result<StreamProperties, ProbeError>;

    /// Returns the frame-type sequence of the video stream, in decode order.
    fn frame_kinds(&self, input: &Locator) -> Result<Vec<FrameKind>, ProbeError>;
}

/// ffprobe-backed prober.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: String,
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self {
            binary: "ffprobe".to_string(),
        }
    }
}

impl FfprobeProber {
    /// Uses a specific ffprobe binary instead of the one on `PATH`.
    #[must_use]
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, args: &[String]) -> Result<String, ProbeError> {
        let output = Command::new(&self.binary).args(args).output()?;
        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Prober for FfprobeProber {
    fn properties(&self, input: &Locator) -> Result<StreamProperties, ProbeError> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_streams".to_string(),
            "-show_format".to_string(),
            input.as_input(),
        ];
        let stdout = self.run(&args)?;
        parse_ffprobe_output(&stdout)
    }

    fn frame_kinds(&self, input: &Locator) -> Result<Vec<FrameKind>, ProbeError> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "frame=pict_type".to_string(),
            "-of".to_string(),
            "csv=p=0".to_string(),
            input.as_input(),
        ];
        let stdout = self.run(&args)?;
        Ok(parse_pict_types(&stdout))
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    bit_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    bit_rate: Option<String>,
}

/// Parses ffprobe `-print_format json -show_streams -show_format` output.
pub fn parse_ffprobe_output(json: &str) -> Result<StreamProperties, ProbeError> {
    let parsed: FfprobeOutput =
        serde_json::from_str(json).map_err(|err| ProbeError::Unparsable {
            reason: err.to_string(),
        })?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or(ProbeError::NoVideoStream)?;
    let audio = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    let width = video.width.ok_or_else(|| ProbeError::Unparsable {
        reason: "video stream missing width".to_string(),
    })?;
    let height = video.height.ok_or_else(|| ProbeError::Unparsable {
        reason: "video stream missing height".to_string(),
    })?;
    let rate = video
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| ProbeError::Unparsable {
            reason: "video stream missing frame rate".to_string(),
        })?;

    let bitrate_bps = video
        .bit_rate
        .as_deref()
        .and_then(|s| s.parse().ok())
        .or_else(|| {
            parsed
                .format
                .as_ref()
                .and_then(|f| f.bit_rate.as_deref())
                .and_then(|s| s.parse().ok())
        });

    Ok(StreamProperties {
        width,
        height,
        fps: rate,
        bitrate_bps,
        codec: video.codec_name.clone().unwrap_or_default(),
        frame_count: video.nb_frames.as_deref().and_then(|s| s.parse().ok()),
        has_audio: audio.is_some(),
        audio_codec: audio.and_then(|s| s.codec_name.clone()),
    })
}

/// Parses an ffprobe rational frame rate such as `30000/1001` or `25/1`.
///
/// Returns `None` for the `0/0` placeholder ffprobe emits on streams it
/// could not measure.
#[must_use]
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = match rate.split_once('/') {
        Some((num, den)) => (num.parse::<f64>().ok()?, den.parse::<f64>().ok()?),
        None => (rate.parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}

/// Parses `frame=pict_type -of csv=p=0` output into a frame-kind sequence.
///
/// ffprobe emits one pict type per line (`I`, `P`, `B`); anything that is
/// not `I` counts as a delta frame.
#[must_use]
pub fn parse_pict_types(output: &str) -> Vec<FrameKind> {
    output
        .lines()
        .filter_map(|line| {
            let tag = line.trim().trim_end_matches(',');
            if tag.is_empty() {
                return None;
            }
            Some(if tag == "I" {
                FrameKind::Key
            } else {
                FrameKind::Delta
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {
                "codec_type": "video",
                "codec_name": "h264",
                "width": 1920,
                "height": 1080,
                "avg_frame_rate": "30000/1001",
                "r_frame_rate": "30000/1001",
                "bit_rate": "4500000",
                "nb_frames": "900"
            },
            {
                "codec_type": "audio",
                "codec_name": "aac"
            }
        ],
        "format": { "bit_rate": "4700000" }
    }"#;

    #[test]
    fn parses_full_output() {
        let props = parse_ffprobe_output(SAMPLE).unwrap();
        assert_eq!(props.width, 1920);
        assert_eq!(props.height, 1080);
        assert!((props.fps - 29.97).abs() < 0.01);
        assert_eq!(props.bitrate_bps, Some(4_500_000));
        assert_eq!(props.codec, "h264");
        assert_eq!(props.frame_count, Some(900));
        assert!(props.has_audio);
        assert_eq!(props.audio_codec.as_deref(), Some("aac"));
    }

    #[test]
    fn falls_back_to_format_bitrate() {
        let json = r#"{
            "streams": [
                {"codec_type": "video", "codec_name": "h264", "width": 640,
                 "height": 480, "avg_frame_rate": "25/1"}
            ],
            "format": {"bit_rate": "900000"}
        }"#;
        let props = parse_ffprobe_output(json).unwrap();
        assert_eq!(props.bitrate_bps, Some(900_000));
        assert!(!props.has_audio);
        assert_eq!(props.frame_count, None);
    }

    #[test]
    fn missing_video_stream_is_typed() {
        let json = r#"{"streams": [{"codec_type": "audio", "codec_name": "aac"}]}"#;
        let err = parse_ffprobe_output(json).unwrap_err();
        assert!(matches!(err, ProbeError::NoVideoStream));
    }

    #[test]
    fn garbage_is_unparsable() {
        let err = parse_ffprobe_output("N/A").unwrap_err();
        assert!(matches!(err, ProbeError::Unparsable { .. }));
    }

    #[test]
    fn frame_rate_rationals() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("30"), Some(30.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("nonsense"), None);
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn pict_type_sequence() {
        let kinds = parse_pict_types("I\nP\nB\nP\nI\n");
        assert_eq!(
            kinds,
            vec![
                FrameKind::Key,
                FrameKind::Delta,
                FrameKind::Delta,
                FrameKind::Delta,
                FrameKind::Key
            ]
        );
    }

    #[test]
    fn pict_types_skip_blank_lines() {
        assert_eq!(parse_pict_types("\nI\n\n"), vec![FrameKind::Key]);
    }
}
