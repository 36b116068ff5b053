//! Console rendering of a report.

use std::io::{self, Write};

use crate::report::{CheckOutcome, Report};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Label column width; check names are padded with dots up to here.
const LABEL_WIDTH: usize = 40;

fn dotted(name: &str) -> String {
    let dots = LABEL_WIDTH.saturating_sub(name.len()).max(1);
    format!("{name}{}", ".".repeat(dots))
}

/// Renders the report for a human operator.
///
/// One line per check, then a summary. Every failing or errored check is
/// listed by name with its measured value and message — a regression must
/// be identifiable from this output alone.
pub fn render(report: &Report, out: &mut impl Write) -> io::Result<()> {
    for result in &report.results {
        let label = dotted(&result.check);
        match result.outcome {
            CheckOutcome::Pass => {
                writeln!(out, "{label}{GREEN}Success! {}{RESET}", result.message)?;
            }
            CheckOutcome::Fail => {
                writeln!(out, "{label}{RED}Failed! {}{RESET}", result.message)?;
            }
            CheckOutcome::Errored => {
                writeln!(out, "{label}{RED}Error! {}{RESET}", result.message)?;
            }
            CheckOutcome::Skipped => {
                writeln!(out, "{label}{DIM}Skipped ({}){RESET}", result.message)?;
            }
        }
    }

    if report.failed_count + report.errored_count == 0 {
        writeln!(out, "{GREEN}Success! All validations passed.{RESET}")?;
    } else {
        let names: Vec<&str> = report.failures().map(|r| r.check.as_str()).collect();
        writeln!(
            out,
            "{RED}Errors found: {}. Failed validations: {}{RESET}",
            report.failed_count + report.errored_count,
            names.join(", ")
        )?;
        for failure in report.failures() {
            match failure.measured {
                Some(value) => writeln!(
                    out,
                    "  {}: measured {value:.3} ({})",
                    failure.check, failure.message
                )?,
                None => writeln!(out, "  {}: {}", failure.check, failure.message)?,
            }
        }
    }
    Ok(())
}
