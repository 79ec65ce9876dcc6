//! # cadscript-rs
//!
//! A two-stage batch pipeline for CAD extract files:
//!
//! 1. **Sort** — read delimited rows, derive a composite sort key from a
//!    hierarchical reference code (`A02.G05.R6`), stably sort, write the
//!    result.
//! 2. **Generate** — for each sorted row, substitute the row's reference
//!    value and a fixed set of process-wide variables into a command
//!    template and append the block to an AutoCAD script file.
//!
//! Both stages are pure library functions over paths and injected
//! capabilities; the `scr-pipe` binary sequences them, running generation
//! only if the sort succeeded.
//!
//! ## Example
//!
//! ```
//! use cadscript_rs::{Record, RefKey, parse_reference, sort_records};
//!
//! let mut rows = vec![
//!     Record::from_fields(["p1", "q1", "r1", "s1", "A02.G05.R6"]),
//!     Record::from_fields(["p2", "q2", "r2", "s2", "A01.G01.R1"]),
//! ];
//! sort_records(&mut rows, 4);
//! assert_eq!(rows[0].field(4), Some("A01.G01.R1"));
//!
//! assert_eq!(parse_reference("A2.G5.R10"), RefKey::new("A", 2, 10, 5));
//! ```

pub mod error;
pub mod generator;
pub mod record;
pub mod reference;
pub mod resolver;
pub mod sorter;

pub use error::PipelineError;
pub use generator::{
    GenerateSummary, MISSING_REF, REF_PLACEHOLDER, generate_script, generate_stage,
};
pub use record::{DEFAULT_REFERENCE_COLUMN, Record, clean_field, trim_quotes};
pub use reference::{RefKey, parse_reference};
pub use resolver::{CBER_VARS, EnvStore, LookupError, VarStore, resolve, resolve_set};
pub use sorter::{
    DEFAULT_DELIMITER, SortSummary, read_records, sort_records, sort_stage, write_records,
};
