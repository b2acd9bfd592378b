//! Tabular record sets
//!
//! Both pipelines end in an Arrow [`RecordBatch`] that a [`crate::sink::RecordSink`]
//! persists. Code records go through `serde_arrow`; fixed-width rows have a
//! layout-dependent schema and are built column by column.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rayon::prelude::*;
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::decompose::{DecomposedCode, decompose};
use crate::error::{ExtractError, Result};
use crate::fixed_width::{DecodedTable, FixedWidthRow};
use crate::models::CodeRecord;

/// Names of the decomposition columns, in output order
pub const DECOMPOSED_COLUMNS: [&str; 5] = ["icd_Code_with_dot", "icd_1", "icd_2", "icd_3", "icd_4"];

/// Convert code records into a two-column batch (`code`, `description`)
pub fn code_records_batch(records: &[CodeRecord]) -> Result<RecordBatch> {
    let fields = Vec::<FieldRef>::from_type::<CodeRecord>(TracingOptions::default())?;
    Ok(serde_arrow::to_record_batch(&fields, &records)?)
}

/// Decompose the code column of every decoded row, in row order
///
/// # Errors
/// Fails on the first row whose code is empty, naming its key and line.
pub fn decompose_rows(
    table: &DecodedTable,
    code_column: &str,
    parallel: bool,
) -> Result<Vec<DecomposedCode>> {
    let position = table.layout.position(code_column).ok_or_else(|| {
        ExtractError::Layout(format!("code column '{code_column}' is not in the layout"))
    })?;

    let decompose_row = |row: &FixedWidthRow| {
        let code = row.get(position).unwrap_or_default();
        decompose(code).map_err(|_| {
            ExtractError::InvalidCode(format!(
                "empty code in record {} (line {})",
                row.key, row.line_number
            ))
        })
    };

    if parallel {
        table.rows.par_iter().map(decompose_row).collect()
    } else {
        table.rows.iter().map(decompose_row).collect()
    }
}

/// Build the output batch for decoded fixed-width rows
///
/// The index column is written as `Int64`, every other layout column as trimmed
/// text. When `decomposed` is given it must hold one entry per row, and the
/// decomposition columns are appended after the layout columns.
pub fn fixed_width_batch(
    table: &DecodedTable,
    decomposed: Option<&[DecomposedCode]>,
) -> Result<RecordBatch> {
    let mut fields: Vec<Field> = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();

    for (position, column) in table.layout.columns().iter().enumerate() {
        if table.layout.index_column() == Some(column.name.as_str()) {
            fields.push(Field::new(&column.name, DataType::Int64, false));
            columns.push(Arc::new(Int64Array::from_iter_values(
                table.rows.iter().map(|row| row.key),
            )));
        } else {
            fields.push(Field::new(&column.name, DataType::Utf8, false));
            columns.push(Arc::new(StringArray::from_iter_values(
                table.rows.iter().map(|row| row.get(position).unwrap_or_default()),
            )));
        }
    }

    if let Some(codes) = decomposed {
        if codes.len() != table.rows.len() {
            return Err(ExtractError::Layout(format!(
                "{} decomposed codes for {} rows",
                codes.len(),
                table.rows.len()
            )));
        }
        if let Some(clash) = DECOMPOSED_COLUMNS
            .iter()
            .find(|name| table.layout.position(name).is_some())
        {
            return Err(ExtractError::Layout(format!(
                "layout column '{clash}' collides with a decomposition column"
            )));
        }

        let (with_dot, part1, part2, part3, part4): (Vec<_>, Vec<_>, Vec<_>, Vec<_>, Vec<_>) = codes
            .iter()
            .map(|code| {
                (
                    code.code_with_separator.clone(),
                    code.part1.to_string(),
                    code.part2.clone(),
                    code.part3.clone(),
                    code.part4.map(String::from),
                )
            })
            .multiunzip();

        let nullable = [false, false, false, true, true];
        for (name, nullable) in DECOMPOSED_COLUMNS.iter().zip(nullable) {
            fields.push(Field::new(*name, DataType::Utf8, nullable));
        }
        columns.push(Arc::new(StringArray::from(with_dot)));
        columns.push(Arc::new(StringArray::from(part1)));
        columns.push(Arc::new(StringArray::from(part2)));
        columns.push(Arc::new(StringArray::from(part3)));
        columns.push(Arc::new(StringArray::from(part4)));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
