//! Repeated keys within a single raw env file.
//!
//! The parser folds repeats (last write wins), so duplicates are counted on
//! the unparsed text instead.

use indexmap::IndexMap;
use serde::Serialize;

use crate::parser::{
    env_lines,
    split_assignment,
};

/// A key that appears more than once in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    /// Variable name.
    pub key: String,
    /// Total number of occurrences, always at least 2.
    pub count: usize,
}

/// Counts repeated keys in raw `.env` text.
///
/// Keys are reported in order of first appearance, with their total
/// occurrence count.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::find_duplicates;
///
/// let dups = find_duplicates("FOO=one\nBAR=two\nFOO=three\n");
/// assert_eq!(dups.len(), 1);
/// assert_eq!((dups[0].key.as_str(), dups[0].count), ("FOO", 2));
/// ```
pub fn find_duplicates(raw: &str) -> Vec<Duplicate> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for line in env_lines(raw) {
        if let Some((key, _)) = split_assignment(line) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, count)| Duplicate {
            key: key.to_string(),
            count,
        })
        .collect()
}

/// Sum of `count - 1` over `duplicates`: the number of redundant lines.
pub fn excess_occurrences(duplicates: &[Duplicate]) -> usize {
    duplicates.iter().map(|d| d.count.saturating_sub(1)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_exact_counts() {
        let dups = find_duplicates("FOO=one\nBAR=two\nFOO=three\nFOO=four\nBAR=five\n");
        assert_eq!(
            dups,
            vec![
                Duplicate {
                    key: "FOO".to_string(),
                    count: 3
                },
                Duplicate {
                    key: "BAR".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(excess_occurrences(&dups), 3);
    }

    #[test]
    fn test_unique_keys_are_not_reported() {
        assert!(find_duplicates("A=1\nB=2\n").is_empty());
        assert!(find_duplicates("").is_empty());
    }

    #[test]
    fn test_skip_rules_match_parser() {
        let raw = "# A=commented\nA=1\n\n=nokey\nnoequals\n  A = 2 \n";
        let dups = find_duplicates(raw);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].count, 2);
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let raw = "\u{feff}KEY=1\nKEY=2\n";
        let dups = find_duplicates(raw);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].key, "KEY");
    }

    #[test]
    fn test_every_reported_count_is_at_least_two() {
        let raw = "A=1\nB=1\nA=2\nC=1\nC=2\nC=3\nD=1";
        for dup in find_duplicates(raw) {
            assert!(dup.count >= 2);
        }
    }
}
