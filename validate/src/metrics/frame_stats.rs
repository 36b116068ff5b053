//! Per-frame scalar statistics.
//!
//! Each function reduces one luma frame to a scalar; the frame-statistic
//! checks average that scalar over a capped sample of frames from both the
//! baseline and the artifact and compare the difference.

use media::{FrameRead, GrayFrame, ProbeError};

/// Mean luma over the whole frame. Higher is brighter.
#[must_use]
pub fn mean_luma(frame: &GrayFrame) -> f64 {
    let sum: u64 = frame.data().iter().map(|&p| u64::from(p)).sum();
    sum as f64 / frame.data().len() as f64
}

/// Standard deviation of luma over the whole frame. Higher is more
/// contrast.
#[must_use]
pub fn luma_stddev(frame: &GrayFrame) -> f64 {
    let mean = mean_luma(frame);
    let variance = frame
        .data()
        .iter()
        .map(|&p| {
            let diff = f64::from(p) - mean;
            diff * diff
        })
        .sum::<f64>()
        / frame.data().len() as f64;
    variance.sqrt()
}

/// Variance of the 4-neighbor Laplacian response over interior pixels.
///
/// Low values mean soft edges (blur); a jump upward means injected
/// high-frequency content (noise). Frames smaller than 3x3 have no
/// interior and yield 0.
#[must_use]
pub fn laplacian_variance(frame: &GrayFrame) -> f64 {
    let width = frame.width();
    let height = frame.height();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut responses = Vec::with_capacity((width - 2) * (height - 2));
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = 4.0 * f64::from(frame.pixel(x, y));
            let neighbors = f64::from(frame.pixel(x - 1, y))
                + f64::from(frame.pixel(x + 1, y))
                + f64::from(frame.pixel(x, y - 1))
                + f64::from(frame.pixel(x, y + 1));
            responses.push(center - neighbors);
        }
    }

    let mean = responses.iter().sum::<f64>() / responses.len() as f64;
    responses
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / responses.len() as f64
}

/// Mean of the per-column means.
///
/// Horizontal drift moves content across columns, shifting this profile
/// between baseline and artifact.
#[must_use]
pub fn column_profile_mean(frame: &GrayFrame) -> f64 {
    let width = frame.width();
    let height = frame.height();
    let mut total = 0.0;
    for x in 0..width {
        let mut column: u64 = 0;
        for y in 0..height {
            column += u64::from(frame.pixel(x, y));
        }
        total += column as f64 / height as f64;
    }
    total / width as f64
}

/// Averages `stat` over up to `cap` frames from `read`.
///
/// Returns `None` when the stream decodes to zero frames.
pub fn average_stat(
    read: &mut dyn FrameRead,
    cap: usize,
    stat: fn(&GrayFrame) -> f64,
) -> Result<Option<f64>, ProbeError> {
    let mut total = 0.0;
    let mut count = 0usize;
    while count < cap {
        match read.next_frame()? {
            Some(frame) => {
                total += stat(&frame);
                count += 1;
            }
            None => break,
        }
    }
    if count == 0 {
        return Ok(None);
    }
    Ok(Some(total / count as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use media::mock::SyntheticSource;
    use media::{FrameSource, Locator};
    use std::path::PathBuf;

    fn gradient_frame(width: usize, height: usize) -> GrayFrame {
        let data: Vec<u8> = (0..width * height)
            .map(|i| ((i % width) * 255 / (width - 1)) as u8)
            .collect();
        GrayFrame::new(width, height, data).unwrap()
    }

    #[test]
    fn mean_luma_of_flat_frame() {
        assert_eq!(mean_luma(&GrayFrame::filled(8, 8, 50)), 50.0);
    }

    #[test]
    fn stddev_of_flat_frame_is_zero() {
        assert_eq!(luma_stddev(&GrayFrame::filled(8, 8, 50)), 0.0);
    }

    #[test]
    fn stddev_grows_with_contrast() {
        let mut data = vec![0u8; 64];
        for (i, value) in data.iter_mut().enumerate() {
            *value = if i % 2 == 0 { 0 } else { 255 };
        }
        let checkerboard = GrayFrame::new(8, 8, data).unwrap();
        assert!(luma_stddev(&checkerboard) > 100.0);
    }

    #[test]
    fn laplacian_flat_is_zero() {
        assert_eq!(laplacian_variance(&GrayFrame::filled(8, 8, 100)), 0.0);
    }

    #[test]
    fn laplacian_sharp_exceeds_smooth() {
        let mut noisy = vec![0u8; 64];
        for (i, value) in noisy.iter_mut().enumerate() {
            *value = if (i / 8 + i % 8) % 2 == 0 { 0 } else { 255 };
        }
        let sharp = GrayFrame::new(8, 8, noisy).unwrap();
        let smooth = gradient_frame(8, 8);
        assert!(laplacian_variance(&sharp) > laplacian_variance(&smooth));
    }

    #[test]
    fn laplacian_of_tiny_frame_is_zero() {
        assert_eq!(laplacian_variance(&GrayFrame::filled(2, 2, 10)), 0.0);
    }

    #[test]
    fn column_profile_shifts_with_content() {
        // Bright band on the left vs. on the right: per-column profile
        // means are equal, but a half-bright frame differs from both.
        let bright_left = {
            let mut data = vec![0u8; 64];
            for y in 0..8 {
                for x in 0..4 {
                    data[y * 8 + x] = 200;
                }
            }
            GrayFrame::new(8, 8, data).unwrap()
        };
        let flat = GrayFrame::filled(8, 8, 50);
        assert!((column_profile_mean(&bright_left) - column_profile_mean(&flat)).abs() > 5.0);
    }

    #[test]
    fn average_stat_respects_cap() {
        let frames = vec![
            GrayFrame::filled(4, 4, 10),
            GrayFrame::filled(4, 4, 20),
            GrayFrame::filled(4, 4, 90),
        ];
        let source = SyntheticSource::new(frames);
        let mut read = source.open(&Locator::File(PathBuf::from("x.mp4"))).unwrap();
        let avg = average_stat(&mut *read, 2, mean_luma).unwrap().unwrap();
        assert_eq!(avg, 15.0);
    }

    #[test]
    fn average_stat_empty_stream_is_none() {
        let source = SyntheticSource::new(Vec::new());
        let mut read = source.open(&Locator::File(PathBuf::from("x.mp4"))).unwrap();
        assert_eq!(average_stat(&mut *read, 30, mean_luma).unwrap(), None);
    }
}
