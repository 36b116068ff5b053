//! Metric extraction algorithms shared by the check bodies.

mod frame_stats;
mod keyframes;
mod overlay;
mod similarity;

pub use frame_stats::{
    average_stat, column_profile_mean, laplacian_variance, luma_stddev, mean_luma,
};
pub use keyframes::max_keyframe_gap;
pub use overlay::{best_correlation, normalized_correlation};
pub use similarity::{error_relevant, line_similarity, ocr_relevant, relevant_lines};
