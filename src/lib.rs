//! A Rust library for extracting ICD-10-CM codes from page text and fixed-width
//! order files, and decomposing them into their hierarchical parts.

pub mod config;
pub mod consolidate;
pub mod decompose;
pub mod error;
pub mod extract;
pub mod fixed_width;
pub mod grammar;
pub mod models;
pub mod pipeline;
pub mod sink;
pub mod table;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{ExtractionConfig, FixedWidthConfig, TextConfig};
pub use error::{ExtractError, Result};
pub use models::CodeRecord;

// Text path
pub use consolidate::{consolidate_lines, consolidate_page, split_pages};
pub use extract::{Extraction, extract_page, extract_pages, extract_records};
pub use grammar::CodeGrammar;

// Fixed-width path
pub use decompose::{DecomposedCode, HierarchySummary, IcdChapter, decompose, display_form};
pub use fixed_width::{DecodedTable, FixedWidthLayout, FixedWidthRow, decode_file, decode_str};

// Pipelines and persistence
pub use pipeline::{InputSource, PipelineReport, run_fixed_width_pipeline, run_text_document, run_text_pipeline};
pub use sink::{CsvSink, MemorySink, ParquetSink, RecordSink, sink_for_path};

// Arrow types
pub use arrow::record_batch::RecordBatch;
