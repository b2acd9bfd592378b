//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use crate::pipeline::PipelineReport;

/// Print the outcome of a pipeline run
pub fn print_report(report: &PipelineReport) {
    println!("Wrote {} records in {:?}", report.records, report.elapsed);
    if report.dropped > 0 || report.empty > 0 {
        println!(
            "Dropped {} entries without a code ({} empty)",
            report.dropped, report.empty
        );
    }
    if report.skipped > 0 {
        println!("Skipped {} malformed lines", report.skipped);
    }
    if let Some(summary) = &report.summary {
        println!("{summary}");
    }
}
