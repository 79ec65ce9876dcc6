//! Reference-code parsing and the composite sort key.
//!
//! A reference code is a three-segment hierarchical identifier such as
//! `A02.G05.R6`:
//!
//! - Segment 1: group letter + group number (`A02`)
//! - Segment 2: `G` + sub-group number (`G05`)
//! - Segment 3: `R` + item number (`R6`)
//!
//! Parsing is total: every input string, however malformed, yields a
//! [`RefKey`]. Malformed pieces degrade to the empty letter or zero, so
//! bad references sort into a default bucket instead of failing the run.

use regex::Regex;
use std::sync::LazyLock;

static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z])([0-9]+)").unwrap());
static SUBGROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^G([0-9]+)").unwrap());
static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^R([0-9]+)").unwrap());

/// Composite sort key derived from a reference code.
///
/// The derived `Ord` compares fields in declaration order: letter, then
/// group number, then item number, then sub-group number. Item number (the
/// `R` segment) deliberately ranks before sub-group number (the `G`
/// segment) even though it appears last in the textual form; callers rely
/// on this observable ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefKey {
    pub letter: String,
    pub group: u64,
    pub item: u64,
    pub subgroup: u64,
}

impl RefKey {
    pub fn new(letter: &str, group: u64, item: u64, subgroup: u64) -> Self {
        Self {
            letter: letter.to_string(),
            group,
            item,
            subgroup,
        }
    }
}

/// Parse digits captured by one of the segment regexes.
///
/// The regex guarantees an all-digit string, so the only possible failure
/// is overflow; a digit run too long for `u64` degrades to 0.
fn parse_digits(digits: &str) -> u64 {
    digits.parse().unwrap_or(0)
}

/// Parse a reference code into its sort key. Total; never fails.
///
/// Rules:
/// - Empty (after trimming) returns the all-default key.
/// - Anything other than exactly 3 dot-separated segments returns the
///   all-default key, even if individual segments would parse.
/// - Each segment is matched against an anchored prefix pattern; a
///   non-matching segment contributes its default (`""` or 0) while the
///   other segments still parse.
///
/// Matching is prefix-anchored, not full-match: `A2x.G5.R1` still yields
/// letter `A`, group 2.
pub fn parse_reference(reference: &str) -> RefKey {
    let reference = reference.trim();
    if reference.is_empty() {
        return RefKey::default();
    }

    let segments: Vec<&str> = reference.split('.').collect();
    if segments.len() != 3 {
        return RefKey::default();
    }

    let (letter, group) = match GROUP_RE.captures(segments[0]) {
        Some(caps) => (caps[1].to_string(), parse_digits(&caps[2])),
        None => (String::new(), 0),
    };

    let subgroup = match SUBGROUP_RE.captures(segments[1]) {
        Some(caps) => parse_digits(&caps[1]),
        None => 0,
    };

    let item = match ITEM_RE.captures(segments[2]) {
        Some(caps) => parse_digits(&caps[1]),
        None => 0,
    };

    RefKey {
        letter,
        group,
        item,
        subgroup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_reference() {
        assert_eq!(
            parse_reference("A02.G05.R6"),
            RefKey::new("A", 2, 6, 5)
        );
    }

    #[test]
    fn leading_zeros_parse_as_integers() {
        assert_eq!(
            parse_reference("B007.G002.R010"),
            RefKey::new("B", 7, 10, 2)
        );
    }

    #[test]
    fn example_from_contract() {
        // A2.G5.R10 -> ('A', 2, 10, 5)
        assert_eq!(parse_reference("A2.G5.R10"), RefKey::new("A", 2, 10, 5));
    }

    #[test]
    fn empty_and_whitespace_yield_default() {
        assert_eq!(parse_reference(""), RefKey::default());
        assert_eq!(parse_reference("   "), RefKey::default());
    }

    #[test]
    fn wrong_segment_count_yields_full_default() {
        assert_eq!(parse_reference("A02.G05"), RefKey::default());
        assert_eq!(parse_reference("A02.G05.R6.X1"), RefKey::default());
        // Segments that would individually parse do not rescue the key
        assert_eq!(parse_reference("A02"), RefKey::default());
    }

    #[test]
    fn bad_segments_yield_partial_defaults() {
        // Lowercase letter fails the first pattern
        assert_eq!(parse_reference("a02.G05.R6"), RefKey::new("", 0, 6, 5));
        // Wrong marker in the middle segment
        assert_eq!(parse_reference("A02.X05.R6"), RefKey::new("A", 2, 6, 0));
        // Non-numeric tail in the last segment
        assert_eq!(parse_reference("A02.G05.Rx"), RefKey::new("A", 2, 0, 5));
    }

    #[test]
    fn prefix_match_tolerates_trailing_garbage() {
        assert_eq!(parse_reference("A2x.G5.R1"), RefKey::new("A", 2, 1, 5));
    }

    #[test]
    fn item_sorts_before_subgroup() {
        // R segment outranks G segment in the key ordering
        let low_item = parse_reference("A1.G9.R1");
        let high_item = parse_reference("A1.G1.R2");
        assert!(low_item < high_item);
    }

    #[test]
    fn key_ordering_is_lexicographic_over_fields() {
        let a = parse_reference("A01.G01.R1");
        let b = parse_reference("A02.G05.R1");
        let c = parse_reference("A02.G05.R6");
        assert!(a < b && b < c);
    }

    #[test]
    fn arbitrary_garbage_never_panics() {
        for s in ["...", "..", "\"A02\".G05.R6", "🙂.G1.R1", "1.2.3", ".G1.R1"] {
            let _ = parse_reference(s);
        }
        assert_eq!(parse_reference("..."), RefKey::default());
        assert_eq!(parse_reference("1.2.3"), RefKey::default());
    }
}
