//! Log similarity checks.

use std::fs;

use crate::context::{CheckContext, LogPair};
use crate::error::CheckError;
use crate::metrics::{error_relevant, line_similarity, ocr_relevant, relevant_lines};
use crate::registry::CheckResult;

fn read_pair(pair: &LogPair) -> Result<(String, String), CheckError> {
    let original = fs::read_to_string(&pair.original)?;
    let simulated = fs::read_to_string(&pair.simulated)?;
    Ok((original, simulated))
}

/// Scoreboard OCR must keep reading the same values through degradation.
///
/// Zero relevant entries on both sides is a failure here: the whole point
/// of the OCR log is that scoreboard data exists, so its absence is
/// itself a defect.
pub(crate) fn ocr_similarity(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let pair = ctx
        .aux
        .ocr_logs
        .as_ref()
        .ok_or_else(|| CheckError::invalid("ocr log pair required"))?;
    let (original, simulated) = read_pair(pair)?;
    let original_lines = relevant_lines(&original, ocr_relevant);
    let simulated_lines = relevant_lines(&simulated, ocr_relevant);

    match line_similarity(&original_lines, &simulated_lines) {
        None => Ok(CheckResult::fail(
            None,
            "no scoreboard entries found in either log".to_string(),
        )),
        Some(similarity) => {
            let passed = similarity >= ctx.config.similarity_threshold;
            let message = format!(
                "ocr similarity {similarity:.3} vs minimum {}",
                ctx.config.similarity_threshold
            );
            Ok(if passed {
                CheckResult::pass(Some(similarity), message)
            } else {
                CheckResult::fail(Some(similarity), message)
            })
        }
    }
}

/// Degradation must not introduce new error lines relative to baseline.
///
/// Zero relevant entries on both sides passes: two clean logs have
/// nothing to disagree about.
pub(crate) fn error_log_similarity(ctx: &CheckContext<'_>) -> Result<CheckResult, CheckError> {
    let pair = ctx
        .aux
        .error_logs
        .as_ref()
        .ok_or_else(|| CheckError::invalid("error log pair required"))?;
    let (original, simulated) = read_pair(pair)?;
    let original_lines = relevant_lines(&original, error_relevant);
    let simulated_lines = relevant_lines(&simulated, error_relevant);

    match line_similarity(&original_lines, &simulated_lines) {
        None => Ok(CheckResult::pass(
            None,
            "no error entries on either side".to_string(),
        )),
        Some(similarity) => {
            let passed = similarity >= ctx.config.similarity_threshold;
            let message = format!(
                "error log similarity {similarity:.3} vs minimum {}",
                ctx.config.similarity_threshold
            );
            Ok(if passed {
                CheckResult::pass(Some(similarity), message)
            } else {
                CheckResult::fail(Some(similarity), message)
            })
        }
    }
}
