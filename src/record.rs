//! Delimited record model.
//!
//! A [`Record`] is an ordered sequence of string fields parsed from one
//! delimited line. Field counts vary row to row; there is no schema beyond
//! "the reference field lives at a configurable column index" (default 4).
//! Fields are never reordered inside a record; sorting permutes whole
//! records.

use crate::reference::{RefKey, parse_reference};

/// Column index holding the reference code unless overridden.
pub const DEFAULT_REFERENCE_COLUMN: usize = 4;

/// One delimited row: an ordered list of string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Build a record from string-ish field values (test convenience).
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at `idx`, or `None` when the row is too short.
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    /// Sort key for this record.
    ///
    /// Rows without a field at `reference_column` get the all-default key
    /// and collect at the front of the sorted output. The field value is
    /// quote-stripped before parsing so quoted extracts sort identically
    /// to unquoted ones.
    pub fn sort_key(&self, reference_column: usize) -> RefKey {
        match self.field(reference_column) {
            Some(value) => parse_reference(trim_quotes(value)),
            None => RefKey::default(),
        }
    }
}

/// Strip at most one leading and one trailing double quote.
///
/// Deliberately simplistic: no balanced-quote parsing, no unescaping.
pub fn trim_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Clean a field value: trim whitespace, strip one quote pair, trim again.
///
/// `  "A02.G05.R6"  ` and `A02.G05.R6` clean to the same string.
pub fn clean_field(value: &str) -> &str {
    trim_quotes(value.trim()).trim()
}
