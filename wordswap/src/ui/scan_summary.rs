//! Human-readable summary of a replacement run.

use owo_colors::OwoColorize;
use std::io::{self, Write};
use wordswap_core::ScanReport;

pub fn print_summary<W: Write>(
    report: &ScanReport,
    writer: &mut W,
    supports_color: bool,
) -> io::Result<()> {
    let headline = format!(
        "{} replacement(s) in {} of {} text node(s).",
        report.replacements, report.changed, report.text_nodes
    );
    if supports_color {
        writeln!(writer, "{}", headline.bold())?;
    } else {
        writeln!(writer, "{}", headline)?;
    }
    if report.pruned > 0 {
        writeln!(writer, "  {} protected region(s) left untouched.", report.pruned)?;
    }
    if report.timed_out > 0 {
        let line = format!(
            "  {} text node(s) skipped after exceeding the time budget.",
            report.timed_out
        );
        if supports_color {
            writeln!(writer, "{}", line.yellow())?;
        } else {
            writeln!(writer, "{}", line)?;
        }
    }
    Ok(())
}
