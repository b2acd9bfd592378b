//! Persistence of record sets
//!
//! Pipelines hand their finished [`RecordBatch`] to a [`RecordSink`] and never
//! touch the filesystem layout themselves.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use arrow::csv::{Writer as CsvWriter, WriterBuilder};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::Result;
use crate::error::util::ensure_parent_dir;

/// Destination for record batches
pub trait RecordSink {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Write one batch
    fn write_batch(&mut self, batch: &RecordBatch) -> Result<()>;

    /// Flush and close the destination
    fn finish(&mut self) -> Result<()>;
}

/// Writes batches as CSV with a header row
///
/// The file is created on the first batch, so a run that fails before writing
/// leaves any existing output in place.
pub struct CsvSink {
    path: PathBuf,
    writer: Option<CsvWriter<BufWriter<File>>>,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: None,
        }
    }
}

impl RecordSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        if self.writer.is_none() {
            ensure_parent_dir(&self.path)?;
            let file = File::create(&self.path)?;
            self.writer = Some(
                WriterBuilder::new()
                    .with_header(true)
                    .build(BufWriter::new(file)),
            );
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.write(batch)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.into_inner().flush()?;
        }
        Ok(())
    }
}

/// Writes batches to a single Parquet file
///
/// The writer is opened on the first batch, since Parquet needs the schema up
/// front.
pub struct ParquetSink {
    path: PathBuf,
    writer: Option<ArrowWriter<File>>,
}

impl ParquetSink {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: None,
        }
    }
}

impl RecordSink for ParquetSink {
    fn name(&self) -> &'static str {
        "parquet"
    }

    fn write_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        if self.writer.is_none() {
            ensure_parent_dir(&self.path)?;
            let file = File::create(&self.path)?;
            let props = WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build();
            self.writer = Some(ArrowWriter::try_new(file, batch.schema(), Some(props))?);
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.write(batch)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.close()?;
        }
        Ok(())
    }
}

/// Keeps batches in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<RecordBatch>,
    pub finished: bool,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows over all batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

impl RecordSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        self.batches.push(batch.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Pick a file sink from the output extension: `.parquet`/`.pq` or CSV otherwise
pub fn sink_for_path(path: &Path) -> Result<Box<dyn RecordSink>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("parquet" | "pq") => Ok(Box::new(ParquetSink::new(path))),
        _ => Ok(Box::new(CsvSink::new(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CodeRecord;
    use crate::table::code_records_batch;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn sample_batch() -> RecordBatch {
        code_records_batch(&[
            CodeRecord::new("A01.1", "Foo, bar"),
            CodeRecord::new("A01.2", "Qux"),
        ])
        .unwrap()
    }

    #[test]
    fn test_csv_sink_writes_header_and_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("codes.csv");
        let mut sink = CsvSink::new(&path);
        sink.write_batch(&sample_batch()).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "code,description\nA01.1,\"Foo, bar\"\nA01.2,Qux\n");
    }

    #[test]
    fn test_parquet_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.parquet");
        let mut sink = sink_for_path(&path).unwrap();
        assert_eq!(sink.name(), "parquet");
        sink.write_batch(&sample_batch()).unwrap();
        sink.finish().unwrap();

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_sink_for_path_defaults_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink_for_path(&dir.path().join("codes.txt")).unwrap();
        assert_eq!(sink.name(), "csv");
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write_batch(&sample_batch()).unwrap();
        sink.finish().unwrap();
        assert!(sink.finished);
        assert_eq!(sink.num_rows(), 2);
    }
}
