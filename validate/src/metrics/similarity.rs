//! Positional line similarity between paired logs.

/// OCR log lines worth comparing: scoreboard readings carry one of the
/// domain markers.
#[must_use]
pub fn ocr_relevant(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("score") || lower.contains("time") || lower.contains("period")
}

/// Error log lines worth comparing.
#[must_use]
pub fn error_relevant(line: &str) -> bool {
    line.to_lowercase().contains("error")
}

/// Extracts the relevant subset of a log, preserving order.
#[must_use]
pub fn relevant_lines<'a>(log: &'a str, relevant: fn(&str) -> bool) -> Vec<&'a str> {
    log.lines().filter(|line| relevant(line)).collect()
}

/// Positional similarity of two relevant-line sequences.
///
/// Lines are aligned by index; a position where the sides disagree — or
/// where one side has no line at all — counts as one difference. The
/// result is `(total - differences) / total` with `total` the longer
/// side's length. Returns `None` when both sides are empty; callers
/// decide what an empty comparison means (the OCR and error checks
/// deliberately disagree on it).
#[must_use]
pub fn line_similarity(original: &[&str], simulated: &[&str]) -> Option<f64> {
    let total = original.len().max(simulated.len());
    if total == 0 {
        return None;
    }
    let differences = (0..total)
        .filter(|&idx| original.get(idx) != simulated.get(idx))
        .count();
    Some((total - differences) as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_logs_are_fully_similar() {
        let lines = ["score 1-0", "time 12:04", "period 2"];
        assert_eq!(line_similarity(&lines, &lines), Some(1.0));
    }

    #[test]
    fn one_divergent_line_of_four() {
        let original = ["score 1-0", "time 12:04", "period 2", "score 2-0"];
        let simulated = ["score 1-0", "time 12:04", "period 2", "score 3-0"];
        assert_eq!(line_similarity(&original, &simulated), Some(0.75));
    }

    #[test]
    fn length_mismatch_counts_as_differences() {
        let original = ["score 1-0", "time 12:04"];
        let simulated = ["score 1-0"];
        assert_eq!(line_similarity(&original, &simulated), Some(0.5));
    }

    #[test]
    fn both_empty_is_none() {
        assert_eq!(line_similarity(&[], &[]), None);
    }

    #[test]
    fn one_empty_side_is_zero() {
        let original = ["score 1-0"];
        assert_eq!(line_similarity(&original, &[]), Some(0.0));
    }

    #[test]
    fn ocr_markers() {
        assert!(ocr_relevant("SCORE 3-2"));
        assert!(ocr_relevant("remaining time 02:11"));
        assert!(ocr_relevant("period 3 started"));
        assert!(!ocr_relevant("frame decoded ok"));
    }

    #[test]
    fn error_marker() {
        assert!(error_relevant("ERROR: decode failed"));
        assert!(!error_relevant("all good"));
    }

    #[test]
    fn relevant_lines_preserve_order() {
        let log = "boot ok\nscore 1-0\nnoise\ntime 10:00\n";
        assert_eq!(
            relevant_lines(log, ocr_relevant),
            vec!["score 1-0", "time 10:00"]
        );
    }
}
