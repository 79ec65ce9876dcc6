//! Record sorting stage.
//!
//! Reads all delimited rows into memory, stably sorts them by the composite
//! reference key, and writes the sorted rows back out in one pass. Rows with
//! a missing or malformed reference sort into the default-key bucket at the
//! front; they never fail the stage. Stage failures are missing input, empty
//! input, and I/O faults, reported through [`PipelineError`].

use crate::error::PipelineError;
use crate::record::{Record, trim_quotes};
use crate::reference::{RefKey, parse_reference};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Field delimiter unless overridden.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Number of leading rows reported in the sort preview.
const PREVIEW_ROWS: usize = 5;

/// Outcome of a successful sort stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSummary {
    /// Total rows read, sorted, and written.
    pub rows: usize,
    /// Reference string and parsed key for the first few sorted rows.
    pub preview: Vec<(String, RefKey)>,
}

/// Read every row of a delimited file into memory.
///
/// Rows may have varying field counts; there is no header. The whole file
/// is materialized before the caller sorts it.
pub fn read_records(path: &Path, delimiter: u8) -> Result<Vec<Record>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::InputMissing(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(Record::new(row.iter().map(str::to_string).collect()));
    }
    Ok(records)
}

/// Stably sort records by the reference key at `reference_column`.
///
/// Equal keys keep their input order, so re-sorting a sorted sequence is a
/// no-op.
pub fn sort_records(records: &mut [Record], reference_column: usize) {
    records.sort_by_cached_key(|r| r.sort_key(reference_column));
}

/// Write all records as delimited rows, creating the output's parent
/// directory if absent.
pub fn write_records(path: &Path, records: &[Record], delimiter: u8) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// Build the first-rows preview of a sorted record list.
fn preview(records: &[Record], reference_column: usize) -> Vec<(String, RefKey)> {
    records
        .iter()
        .take(PREVIEW_ROWS)
        .filter_map(|r| r.field(reference_column))
        .map(|raw| {
            let reference = trim_quotes(raw);
            (reference.to_string(), parse_reference(reference))
        })
        .collect()
}

/// Stage 1: read, sort, write.
///
/// Fails (without writing anything) when the input file is missing or
/// yields zero rows, or on any I/O fault. Malformed references never fail
/// the stage.
pub fn sort_stage(
    input: &Path,
    output: &Path,
    reference_column: usize,
    delimiter: u8,
) -> Result<SortSummary, PipelineError> {
    let mut records = read_records(input, delimiter)?;
    if records.is_empty() {
        return Err(PipelineError::InputEmpty(input.to_path_buf()));
    }

    sort_records(&mut records, reference_column);
    write_records(output, &records, delimiter)?;

    Ok(SortSummary {
        rows: records.len(),
        preview: preview(&records, reference_column),
    })
}
