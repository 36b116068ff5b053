//! Overlay template matching.

use media::{GrayFrame, OverlayTemplate};

/// Zero-mean normalized cross-correlation of `template` against `frame`
/// at offset `(ox, oy)`.
///
/// Mask pixels with value zero are excluded from the comparison. Returns
/// a value in `[-1, 1]`; degenerate windows (flat template or flat frame
/// region) yield 0.
#[must_use]
pub fn normalized_correlation(
    frame: &GrayFrame,
    template: &OverlayTemplate,
    ox: usize,
    oy: usize,
) -> f64 {
    let tw = template.gray.width();
    let th = template.gray.height();
    if ox + tw > frame.width() || oy + th > frame.height() {
        return 0.0;
    }

    let included = |x: usize, y: usize| -> bool {
        template
            .mask
            .as_ref()
            .map_or(true, |mask| mask.pixel(x, y) > 0)
    };

    let mut count = 0usize;
    let mut frame_sum = 0.0;
    let mut template_sum = 0.0;
    for y in 0..th {
        for x in 0..tw {
            if !included(x, y) {
                continue;
            }
            frame_sum += f64::from(frame.pixel(ox + x, oy + y));
            template_sum += f64::from(template.gray.pixel(x, y));
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    let frame_mean = frame_sum / count as f64;
    let template_mean = template_sum / count as f64;

    let mut cross = 0.0;
    let mut frame_sq = 0.0;
    let mut template_sq = 0.0;
    for y in 0..th {
        for x in 0..tw {
            if !included(x, y) {
                continue;
            }
            let fd = f64::from(frame.pixel(ox + x, oy + y)) - frame_mean;
            let td = f64::from(template.gray.pixel(x, y)) - template_mean;
            cross += fd * td;
            frame_sq += fd * fd;
            template_sq += td * td;
        }
    }
    let denom = (frame_sq * template_sq).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    cross / denom
}

/// The best correlation of `template` over every placement in `frame`.
#[must_use]
pub fn best_correlation(frame: &GrayFrame, template: &OverlayTemplate) -> f64 {
    let tw = template.gray.width();
    let th = template.gray.height();
    if tw > frame.width() || th > frame.height() {
        return 0.0;
    }
    let mut best = -1.0f64;
    for oy in 0..=frame.height() - th {
        for ox in 0..=frame.width() - tw {
            best = best.max(normalized_correlation(frame, template, ox, oy));
        }
    }
    best
}
