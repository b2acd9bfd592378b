//! Logging helpers for pipeline runs
//!
//! Recoverable anomalies (skipped fixed-width lines, dropped page entries) are
//! absorbed by the pipelines; these helpers are where they become visible.

use std::path::Path;
use std::time::Duration;

use itertools::Itertools;

/// Line numbers listed before a skipped-lines warning is abbreviated
const SKIPPED_PREVIEW: usize = 5;

/// Log the input a pipeline is about to read
pub fn log_operation_start(operation: &str, input: &Path) {
    log::info!("{operation} {}", input.display());
}

/// Log a finished pipeline run with its record count
pub fn log_operation_complete(operation: &str, input: &Path, records: usize, elapsed: Duration) {
    log::info!(
        "Successfully {operation} {records} records from {} in {elapsed:?}",
        input.display()
    );
}

/// Warn about fixed-width lines that were skipped as malformed
pub fn log_skipped_lines(line_numbers: &[usize]) {
    if line_numbers.is_empty() {
        return;
    }
    log::warn!(
        "Skipped {} malformed fixed-width lines (lines {})",
        line_numbers.len(),
        preview_line_numbers(line_numbers)
    );
}

/// Warn that many page entries carried no code
pub fn log_dropped_entries(dropped: usize, entries: usize) {
    log::warn!(
        "{dropped} of {entries} entries carried no recognizable code; records may have been lost at page boundaries"
    );
}

/// First few line numbers, with the remainder summarised
fn preview_line_numbers(line_numbers: &[usize]) -> String {
    let shown = line_numbers.iter().take(SKIPPED_PREVIEW).join(", ");
    match line_numbers.len().checked_sub(SKIPPED_PREVIEW) {
        Some(rest) if rest > 0 => format!("{shown} and {rest} more"),
        _ => shown,
    }
}
