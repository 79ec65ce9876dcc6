//! Pipeline error taxonomy.
//!
//! Only stage-boundary failures live here: missing or empty input, template
//! read faults, and I/O or CSV faults. Malformed reference codes and
//! variable-lookup failures are absorbed inside their components (default
//! sort keys, sentinel strings) and never surface as errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file does not exist.
    #[error("input file does not exist: {0}")]
    InputMissing(PathBuf),

    /// Input file yielded zero rows.
    #[error("input file is empty: {0}")]
    InputEmpty(PathBuf),

    /// Template file could not be read.
    #[error("failed to read template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV read or write fault.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Any other I/O fault during a stage.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
