//! Keyframe interval extraction.

use media::FrameKind;

/// The maximum gap, in frames, between successive keyframes.
///
/// A stream with zero or one keyframe has no successive pair and yields 0,
/// which trivially passes the interval bound.
#[must_use]
pub fn max_keyframe_gap(kinds: &[FrameKind]) -> u64 {
    let mut last_key: Option<usize> = None;
    let mut max_gap = 0u64;
    for (idx, kind) in kinds.iter().enumerate() {
        if *kind != FrameKind::Key {
            continue;
        }
        if let Some(prev) = last_key {
            max_gap = max_gap.max((idx - prev) as u64);
        }
        last_key = Some(idx);
    }
    max_gap
}
