//! Pipeline entry points
//!
//! Each pipeline takes its input and a [`RecordSink`] from the caller, so the
//! same code runs against files, in-memory text and test sinks.
//!
//! - text path: pages -> consolidation -> record extraction -> `code, description`
//! - fixed-width path: positional text -> decoding -> decomposition -> layout
//!   columns plus `icd_*` columns

use std::path::PathBuf;
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use log::info;
use serde::Serialize;

use crate::config::{FixedWidthConfig, TextConfig};
use crate::consolidate::split_pages;
use crate::decompose::HierarchySummary;
use crate::error::Result;
use crate::error::util::safe_read_to_string;
use crate::extract::{Extraction, extract_pages, extract_pages_with_progress};
use crate::fixed_width::{decode_str, decode_str_par};
use crate::sink::RecordSink;
use crate::table::{code_records_batch, decompose_rows, fixed_width_batch};

/// Where pipeline input comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Text already in memory
    Inline(String),
    /// Text file on disk
    File(PathBuf),
}

impl InputSource {
    /// Load the full input text
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => safe_read_to_string(path, "extraction input"),
        }
    }
}

/// Counts and timing of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    /// Records written to the sink
    pub records: usize,
    /// Text path: non-empty entries without a code
    pub dropped: usize,
    /// Text path: empty entries
    pub empty: usize,
    /// Fixed-width path: malformed lines
    pub skipped: usize,
    /// Fixed-width path: unique values per decomposition part
    pub summary: Option<HierarchySummary>,
    pub elapsed: Duration,
}

/// Extract code records from pages of text and write them to `sink`
pub fn run_text_pipeline<S>(
    pages: &[S],
    config: &TextConfig,
    sink: &mut dyn RecordSink,
    progress: Option<&ProgressBar>,
) -> Result<PipelineReport>
where
    S: AsRef<str> + Sync,
{
    let start = Instant::now();

    let Extraction {
        records,
        dropped,
        empty,
    } = match progress {
        Some(pb) => extract_pages_with_progress(pages, config, pb),
        None => extract_pages(pages, config),
    };

    let batch = code_records_batch(&records)?;
    sink.write_batch(&batch)?;
    sink.finish()?;

    info!(
        "Wrote {} code records from {} pages to {} sink",
        records.len(),
        pages.len(),
        sink.name()
    );

    Ok(PipelineReport {
        records: records.len(),
        dropped,
        empty,
        elapsed: start.elapsed(),
        ..PipelineReport::default()
    })
}

/// Split a whole document into pages on form feed and run the text pipeline
pub fn run_text_document(
    source: &InputSource,
    config: &TextConfig,
    sink: &mut dyn RecordSink,
    progress: Option<&ProgressBar>,
) -> Result<PipelineReport> {
    let document = source.read()?;
    let pages = split_pages(&document);
    if let Some(pb) = progress {
        pb.set_length(pages.len() as u64);
    }
    run_text_pipeline(&pages, config, sink, progress)
}

/// Decode fixed-width text, optionally decompose its codes, and write to `sink`
///
/// # Errors
/// Besides IO and Arrow failures, an empty code in any decoded row aborts the run
/// before anything is written.
pub fn run_fixed_width_pipeline(
    source: &InputSource,
    config: &FixedWidthConfig,
    sink: &mut dyn RecordSink,
) -> Result<PipelineReport> {
    let start = Instant::now();
    let text = source.read()?;

    let table = if config.parallel {
        decode_str_par(&text, &config.layout)
    } else {
        decode_str(&text, &config.layout)
    };

    let (batch, summary) = if config.decompose {
        let codes = decompose_rows(&table, &config.code_column, config.parallel)?;
        let summary = HierarchySummary::from_codes(&codes);
        (fixed_width_batch(&table, Some(codes.as_slice()))?, Some(summary))
    } else {
        (fixed_width_batch(&table, None)?, None)
    };

    sink.write_batch(&batch)?;
    sink.finish()?;

    info!(
        "Wrote {} fixed-width records ({} skipped) to {} sink",
        table.rows.len(),
        table.skipped(),
        sink.name()
    );

    Ok(PipelineReport {
        records: table.rows.len(),
        skipped: table.skipped(),
        summary,
        elapsed: start.elapsed(),
        ..PipelineReport::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_text_pipeline_writes_one_batch() {
        let pages = ["Header\nA01.1 Foo\nbar baz\nA01.2 Qux", "Page 2\nB20.0 HIV disease"];
        let mut sink = MemorySink::new();
        let report = run_text_pipeline(&pages, &TextConfig::default(), &mut sink, None).unwrap();
        assert_eq!(report.records, 3);
        assert_eq!(report.dropped, 2);
        assert!(sink.finished);
        assert_eq!(sink.num_rows(), 3);
    }

    #[test]
    fn test_text_document_splits_pages() {
        let source = InputSource::Inline("A00.0 Cholera\u{000C}wrapped onto next page\nA00.1 Other".to_string());
        let mut sink = MemorySink::new();
        let report = run_text_document(&source, &TextConfig::default(), &mut sink, None).unwrap();
        // The continuation on page two cannot join page one's record.
        assert_eq!(report.records, 2);
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_fixed_width_pipeline_summary() {
        let text = "00001 A00     0 Cholera\n00002 A000    1 Cholera due to Vibrio cholerae\nshort\n";
        let mut sink = MemorySink::new();
        let report = run_fixed_width_pipeline(
            &InputSource::Inline(text.to_string()),
            &FixedWidthConfig::default(),
            &mut sink,
        )
        .unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.skipped, 1);
        let summary = report.summary.unwrap();
        assert_eq!(summary.part1, 1);
        assert_eq!(summary.part3, 2);
        assert_eq!(sink.batches[0].num_columns(), 10);
    }

    #[test]
    fn test_fixed_width_pipeline_empty_code_is_fatal() {
        let text = "00001 A00     0 Cholera\n00002         0 Missing";
        let mut sink = MemorySink::new();
        let result = run_fixed_width_pipeline(
            &InputSource::Inline(text.to_string()),
            &FixedWidthConfig::default(),
            &mut sink,
        );
        assert!(result.is_err());
        assert!(sink.batches.is_empty());
    }
}
