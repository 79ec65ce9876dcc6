//! Script generation stage.
//!
//! For each sorted record, the generator takes a fresh copy of the command
//! template, substitutes the per-record reference value and the resolved
//! process-wide variables, and appends the block plus an end-of-record
//! marker line to the output script. Substitution is literal, exhaustive
//! text replacement; placeholder names are disjoint so order does not
//! matter, and nothing from one row ever leaks into the next.

use crate::error::PipelineError;
use crate::record::{Record, clean_field};
use crate::resolver::{CBER_VARS, VarStore, resolve_set};
use crate::sorter::read_records;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Placeholder substituted with the per-record reference value.
pub const REF_PLACEHOLDER: &str = "{CBER_REF}";

/// Sentinel written when a row is too short to carry a reference field.
pub const MISSING_REF: &str = "[MISSING_REF]";

/// Outcome of a successful generation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Blocks written, one per input row.
    pub rows: usize,
    /// Rows that fell back to the missing-reference sentinel.
    pub missing_refs: usize,
}

/// Extract and clean the reference value for one row.
///
/// Rows shorter than `reference_column + 1` fields yield the
/// [`MISSING_REF`] sentinel; generation still completes for them.
fn reference_value(record: &Record, reference_column: usize) -> String {
    match record.field(reference_column) {
        Some(value) => clean_field(value).to_string(),
        None => MISSING_REF.to_string(),
    }
}

/// Substitute one row's values into a fresh copy of the template.
///
/// Every occurrence of each placeholder is replaced, not just the first.
fn substitute(template: &str, ref_value: &str, variables: &BTreeMap<String, String>) -> String {
    let mut block = template.replace(REF_PLACEHOLDER, ref_value);
    for (name, value) in variables {
        block = block.replace(&format!("{{{name}}}"), value);
    }
    block
}

/// Write one templated block per record to `out`, in the given order.
///
/// Returns the summary on success; any write fault aborts the pass (rows
/// already written remain with the writer).
pub fn generate_script<W: Write>(
    records: &[Record],
    template: &str,
    variables: &BTreeMap<String, String>,
    reference_column: usize,
    out: &mut W,
) -> Result<GenerateSummary, PipelineError> {
    let mut missing_refs = 0;

    for record in records {
        let ref_value = reference_value(record, reference_column);
        if ref_value == MISSING_REF {
            missing_refs += 1;
        }

        let block = substitute(template, &ref_value, variables);
        out.write_all(block.as_bytes())?;
        writeln!(out, "\n; --- End of {ref_value} ---")?;
    }

    Ok(GenerateSummary {
        rows: records.len(),
        missing_refs,
    })
}

/// Stage 2: read sorted rows and the template, resolve variables, write the
/// script.
///
/// The output file is created fresh on every run (overwrite, never append).
/// Template read failure or output open failure aborts the stage; variable
/// resolution cannot fail (the resolver always yields a string).
pub fn generate_stage(
    sorted_input: &Path,
    template_path: &Path,
    output: &Path,
    store: &dyn VarStore,
    reference_column: usize,
    delimiter: u8,
) -> Result<GenerateSummary, PipelineError> {
    let records = read_records(sorted_input, delimiter)?;

    let template = fs::read_to_string(template_path).map_err(|source| PipelineError::Template {
        path: template_path.to_path_buf(),
        source,
    })?;

    let variables = resolve_set(store, &CBER_VARS);

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(output)?);
    let summary = generate_script(&records, &template, &variables, reference_column, &mut writer)?;
    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DEFAULT_REFERENCE_COLUMN;

    fn vars(date: &str, nr: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("CBER_DATE".to_string(), date.to_string()),
            ("CBER_NR".to_string(), nr.to_string()),
        ])
    }

    fn row(reference: &str) -> Record {
        Record::from_fields(["a", "b", "c", "d", reference])
    }

    fn generate_to_string(
        records: &[Record],
        template: &str,
        variables: &BTreeMap<String, String>,
    ) -> (String, GenerateSummary) {
        let mut out = Vec::new();
        let summary = generate_script(
            records,
            template,
            variables,
            DEFAULT_REFERENCE_COLUMN,
            &mut out,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn substitutes_reference_and_variables() {
        let records = [row("A02.G05.R6")];
        let (output, summary) = generate_to_string(
            &records,
            "REF:{CBER_REF} DATE:{CBER_DATE}",
            &vars("2024-01-01", "7"),
        );
        assert!(output.starts_with("REF:A02.G05.R6 DATE:2024-01-01"));
        assert!(output.contains("; --- End of A02.G05.R6 ---"));
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.missing_refs, 0);
    }

    #[test]
    fn replaces_every_occurrence() {
        let records = [row("A1.G1.R1")];
        let (output, _) =
            generate_to_string(&records, "{CBER_REF} {CBER_REF} {CBER_NR}", &vars("d", "9"));
        assert!(output.starts_with("A1.G1.R1 A1.G1.R1 9"));
    }

    #[test]
    fn each_row_starts_from_a_fresh_template() {
        let records = [row("A1.G1.R1"), row("A1.G1.R2")];
        let (output, summary) = generate_to_string(&records, "CMD {CBER_REF}", &vars("d", "n"));
        assert!(output.contains("CMD A1.G1.R1"));
        assert!(output.contains("CMD A1.G1.R2"));
        assert_eq!(summary.rows, 2);
    }

    #[test]
    fn quoted_and_padded_reference_is_cleaned() {
        let records = [row("  \"A02.G05.R6\"  ")];
        let (output, _) = generate_to_string(&records, "{CBER_REF}", &vars("d", "n"));
        assert!(output.starts_with("A02.G05.R6\n"));
    }

    #[test]
    fn short_row_uses_missing_ref_sentinel() {
        let records = [Record::from_fields(["only", "four", "fields", "here"])];
        let (output, summary) = generate_to_string(&records, "{CBER_REF}", &vars("d", "n"));
        assert!(output.starts_with("[MISSING_REF]"));
        assert!(output.contains("; --- End of [MISSING_REF] ---"));
        assert_eq!(summary.missing_refs, 1);
    }

    #[test]
    fn one_end_marker_per_row() {
        let records: Vec<Record> = (1..=4).map(|i| row(&format!("A1.G1.R{i}"))).collect();
        let (output, _) = generate_to_string(&records, "x", &vars("d", "n"));
        assert_eq!(output.matches("; --- End of ").count(), 4);
    }

    #[test]
    fn unknown_placeholders_are_left_verbatim() {
        let records = [row("A1.G1.R1")];
        let (output, _) = generate_to_string(&records, "{OTHER} {CBER_REF}", &vars("d", "n"));
        assert!(output.starts_with("{OTHER} A1.G1.R1"));
    }

    #[test]
    fn sentinel_variables_substitute_like_values() {
        let records = [row("A1.G1.R1")];
        let variables = BTreeMap::from([
            ("CBER_DATE".to_string(), "[CBER_DATE_NOT_FOUND]".to_string()),
            ("CBER_NR".to_string(), "[ERROR_CBER_NR]".to_string()),
        ]);
        let (output, _) = generate_to_string(&records, "{CBER_DATE}/{CBER_NR}", &variables);
        assert!(output.starts_with("[CBER_DATE_NOT_FOUND]/[ERROR_CBER_NR]"));
    }
}
