//! Launch descriptor builders.
//!
//! Pipeline-mode simulations express their degradation as a GStreamer-style
//! launch string; the external media server turns it into a live stream.
//! Building the string is the whole job — nothing here runs a pipeline.

use std::path::Path;

/// Demux-and-pay passthrough of an undegraded file.
#[must_use]
pub fn passthrough(video: &Path) -> String {
    format!(
        "( filesrc location={} ! qtdemux ! queue ! h264parse ! rtph264pay name=pay0 pt=96 )",
        video.display()
    )
}

/// Re-encode at a constrained bitrate.
#[must_use]
pub fn low_bitrate(video: &Path, kbit: u32) -> String {
    format!(
        "( filesrc location={} ! decodebin ! x264enc bitrate={kbit} ! rtph264pay name=pay0 pt=96 )",
        video.display()
    )
}

/// Substitute the source with black frames, as a failed camera would.
#[must_use]
pub fn black_source() -> String {
    "( videotestsrc pattern=black ! video/x-raw,width=1280,height=720 \
     ! x264enc ! rtph264pay name=pay0 pt=96 )"
        .to_string()
}

/// Buffer the source behind a fixed queue delay.
#[must_use]
pub fn delayed(video: &Path, delay_ms: u32) -> String {
    let delay_ns = u64::from(delay_ms) * 1_000_000;
    format!(
        "( filesrc location={} ! decodebin ! queue min-threshold-time={delay_ns} \
         ! x264enc ! rtph264pay name=pay0 pt=96 )",
        video.display()
    )
}
