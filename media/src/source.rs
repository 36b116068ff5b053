//! Frame access capability.
//!
//! Frames reach the metric algorithms as 8-bit luma planes. The production
//! source spawns ffmpeg writing rawvideo to a pipe; dimensions come from a
//! probe of the same input, so the reader can slice the byte stream into
//! frames without any container knowledge of its own.

use std::io::Read;
use std::process::{Child, Command, Stdio};

use crate::artifact::Locator;
use crate::error::ProbeError;
use crate::frame::GrayFrame;
use crate::probe::{FfprobeProber, Prober};

/// Which plane of the input to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePlane {
    /// 8-bit luma.
    Luma,
    /// 8-bit alpha, for overlay templates that carry a transparency mask.
    Alpha,
}

/// A sequential reader over decoded frames.
pub trait FrameRead {
    /// Returns the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<GrayFrame>, ProbeError>;
}

/// Capability that opens an artifact for frame-by-frame reading.
pub trait FrameSource {
    /// Opens the luma plane of `input`.
    fn open(&self, input: &Locator) -> Result<Box<dyn FrameRead>, ProbeError> {
        self.open_plane(input, FramePlane::Luma)
    }

    /// Opens a specific plane of `input`.
    ///
    /// Opening [`FramePlane::Alpha`] on an input without an alpha channel
    /// fails; callers that treat the mask as optional map that failure to
    /// "no mask".
    fn open_plane(
        &self,
        input: &Locator,
        plane: FramePlane,
    ) -> Result<Box<dyn FrameRead>, ProbeError>;
}

/// ffmpeg-backed frame source.
#[derive(Debug, Clone)]
pub struct FfmpegFrameSource {
    binary: String,
    prober: FfprobeProber,
}

impl Default for FfmpegFrameSource {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
            prober: FfprobeProber::default(),
        }
    }
}

impl FfmpegFrameSource {
    /// Uses specific ffmpeg/ffprobe binaries instead of the ones on `PATH`.
    #[must_use]
    pub fn with_binaries(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            binary: ffmpeg.into(),
            prober: FfprobeProber::with_binary(ffprobe),
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn open_plane(
        &self,
        input: &Locator,
        plane: FramePlane,
    ) -> Result<Box<dyn FrameRead>, ProbeError> {
        let props = self.prober.properties(input)?;
        let width = props.width as usize;
        let height = props.height as usize;

        let mut command = Command::new(&self.binary);
        command.arg("-v").arg("error").arg("-i").arg(input.as_input());
        if plane == FramePlane::Alpha {
            command.arg("-vf").arg("alphaextract");
        }
        command
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("gray")
            .arg("pipe:1")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());

        let child = command.spawn()?;
        Ok(Box::new(PipeFrameRead {
            child,
            width,
            height,
            done: false,
        }))
    }
}

struct PipeFrameRead {
    child: Child,
    width: usize,
    height: usize,
    done: bool,
}

impl FrameRead for PipeFrameRead {
    fn next_frame(&mut self) -> Result<Option<GrayFrame>, ProbeError> {
        if self.done {
            return Ok(None);
        }
        let stdout = self
            .child
            .stdout
            .as_mut()
            .ok_or_else(|| ProbeError::Unparsable {
                reason: "decoder stdout not captured".to_string(),
            })?;

        let mut buf = vec![0u8; self.width * self.height];
        let mut filled = 0;
        while filled < buf.len() {
            match stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) => return Err(ProbeError::Io(err)),
            }
        }

        if filled == 0 {
            self.done = true;
            let status = self.child.wait()?;
            if !status.success() {
                return Err(ProbeError::CommandFailed {
                    status: status.code(),
                    stderr: String::new(),
                });
            }
            return Ok(None);
        }
        if filled < buf.len() {
            self.done = true;
            return Err(ProbeError::Unparsable {
                reason: format!(
                    "truncated frame: {filled} of {} bytes",
                    self.width * self.height
                ),
            });
        }

        let frame = GrayFrame::new(self.width, self.height, buf).map_err(|err| {
            ProbeError::Unparsable {
                reason: err.to_string(),
            }
        })?;
        Ok(Some(frame))
    }
}

impl Drop for PipeFrameRead {
    fn drop(&mut self) {
        if !self.done {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// A reference overlay image, decoded once and matched against many frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTemplate {
    /// Luma plane of the overlay.
    pub gray: GrayFrame,
    /// Alpha-derived match mask; pixels with value zero are ignored.
    pub mask: Option<GrayFrame>,
}

/// Decodes an overlay reference image through the frame-source capability.
///
/// The image is read as a single-frame video. When the image carries an
/// alpha channel it becomes the match mask; images without one match over
/// their full area.
pub fn load_overlay(
    source: &dyn FrameSource,
    image: &Locator,
) -> Result<OverlayTemplate, ProbeError> {
    let mut reader = source.open(image)?;
    let gray = reader
        .next_frame()?
        .ok_or_else(|| ProbeError::Unparsable {
            reason: format!("overlay image {image} decoded to zero frames"),
        })?;

    let mask = match source.open_plane(image, FramePlane::Alpha) {
        Ok(mut reader) => reader.next_frame().unwrap_or(None),
        Err(_) => None,
    };

    Ok(OverlayTemplate { gray, mask })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::SyntheticSource;

    #[test]
    fn load_overlay_without_alpha() {
        let source = SyntheticSource::new(vec![GrayFrame::filled(4, 4, 128)]);
        let template = load_overlay(&source, &Locator::Stream("mem:overlay".into())).unwrap();
        assert_eq!(template.gray.width(), 4);
        assert!(template.mask.is_none());
    }

    #[test]
    fn load_overlay_with_alpha() {
        let source = SyntheticSource::new(vec![GrayFrame::filled(4, 4, 128)])
            .with_alpha(vec![GrayFrame::filled(4, 4, 255)]);
        let template = load_overlay(&source, &Locator::Stream("mem:overlay".into())).unwrap();
        assert!(template.mask.is_some());
    }

    #[test]
    fn load_overlay_rejects_empty_stream() {
        let source = SyntheticSource::new(Vec::new());
        let err = load_overlay(&source, &Locator::Stream("mem:none".into())).unwrap_err();
        assert!(matches!(err, ProbeError::Unparsable { .. }));
    }
}
