//! Fixed-width file decoding
//!
//! Positional files carry no delimiter: every field sits at a fixed character
//! offset. A [`FixedWidthLayout`] names the columns and their widths in order,
//! and the decoder slices each line left to right into those fields.
//!
//! Short lines keep their leading fields and leave the rest empty. A line that
//! cannot supply the first column (or whose index column is not an integer) is
//! skipped and counted instead of failing the parse.

pub mod layout;

use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::error::util::safe_read_to_string;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_skipped_lines};

pub use layout::{ColumnSpec, FixedWidthLayout};

/// One decoded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWidthRow {
    /// Record key: the parsed index column, or a running count when the layout has none
    pub key: i64,
    /// 1-based line number in the source
    pub line_number: usize,
    /// Untrimmed field slices in layout order
    pub fields: Vec<String>,
}

impl FixedWidthRow {
    /// Field at `position`, with padding removed
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(|f| f.trim())
    }
}

/// Result of decoding a fixed-width source
#[derive(Debug, Clone)]
pub struct DecodedTable {
    /// Layout the rows were decoded with
    pub layout: FixedWidthLayout,
    /// Decoded rows in source order
    pub rows: Vec<FixedWidthRow>,
    /// Line numbers of skipped lines
    pub skipped_lines: Vec<usize>,
}

impl DecodedTable {
    /// Number of skipped lines
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }

    /// Trimmed value of the named column in `row`
    #[must_use]
    pub fn field<'a>(&self, row: &'a FixedWidthRow, name: &str) -> Option<&'a str> {
        self.layout.position(name).and_then(|pos| row.get(pos))
    }

    /// Whether any rows were decoded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of decoding a single line before keys are assigned
enum LineOutcome {
    Row { index: Option<i64>, fields: Vec<String> },
    Skipped,
}

/// Slice one line into the layout's fields
fn decode_line(line: &str, layout: &FixedWidthLayout) -> LineOutcome {
    let first_width = layout.columns()[0].width;
    if line.chars().count() < first_width {
        return LineOutcome::Skipped;
    }

    let mut fields = Vec::with_capacity(layout.len());
    let mut rest = line;
    for column in layout.columns() {
        let end = rest
            .char_indices()
            .nth(column.width)
            .map_or(rest.len(), |(offset, _)| offset);
        fields.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    let index = if layout.index_column().is_some() {
        match fields[0].trim().parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => return LineOutcome::Skipped,
        }
    } else {
        None
    };

    LineOutcome::Row { index, fields }
}

/// Assign record keys in source order and collect skipped line numbers
fn assemble<I>(outcomes: I, layout: &FixedWidthLayout) -> DecodedTable
where
    I: IntoIterator<Item = (usize, LineOutcome)>,
{
    let mut rows = Vec::new();
    let mut skipped_lines = Vec::new();
    let mut running_key: i64 = 0;

    for (line_number, outcome) in outcomes {
        match outcome {
            LineOutcome::Row { index, fields } => {
                running_key += 1;
                rows.push(FixedWidthRow {
                    key: index.unwrap_or(running_key),
                    line_number,
                    fields,
                });
            }
            LineOutcome::Skipped => {
                debug!("Skipping malformed fixed-width line {line_number}");
                skipped_lines.push(line_number);
            }
        }
    }

    log_skipped_lines(&skipped_lines);

    DecodedTable {
        layout: layout.clone(),
        rows,
        skipped_lines,
    }
}

/// Decode fixed-width text, one record per line
#[must_use]
pub fn decode_str(text: &str, layout: &FixedWidthLayout) -> DecodedTable {
    assemble(
        text.lines()
            .enumerate()
            .map(|(i, line)| (i + 1, decode_line(line, layout))),
        layout,
    )
}

/// Decode fixed-width text with lines sliced in parallel
///
/// Output order and keys are identical to [`decode_str`].
#[must_use]
pub fn decode_str_par(text: &str, layout: &FixedWidthLayout) -> DecodedTable {
    let lines: Vec<&str> = text.lines().collect();
    let outcomes: Vec<(usize, LineOutcome)> = lines
        .par_iter()
        .enumerate()
        .map(|(i, line)| (i + 1, decode_line(line, layout)))
        .collect();
    assemble(outcomes, layout)
}

/// Decode fixed-width records from a buffered reader
pub fn decode_reader<R: BufRead>(reader: R, layout: &FixedWidthLayout) -> Result<DecodedTable> {
    let mut outcomes = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        outcomes.push((i + 1, decode_line(&line, layout)));
    }
    Ok(assemble(outcomes, layout))
}

/// Read and decode a fixed-width file
pub fn decode_file(path: &Path, layout: &FixedWidthLayout, parallel: bool) -> Result<DecodedTable> {
    let start = Instant::now();
    log_operation_start("Decoding fixed-width file", path);

    let text = safe_read_to_string(path, "fixed-width decoding")?;
    let table = if parallel {
        decode_str_par(&text, layout)
    } else {
        decode_str(&text, layout)
    };

    log_operation_complete("decoded", path, table.rows.len(), start.elapsed());
    Ok(table)
}
