//! The `dotenv-diff-ignore` annotation.
//!
//! A line carrying the marker, or the line directly below it, is skipped by
//! both the usage scanner and the source secret detector.

use once_cell::sync::Lazy;
use regex::Regex;

/// Comment forms that carry the marker. The bare phrase is listed last and
/// subsumes the others; the explicit forms document what is accepted.
static IGNORE_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)//\s*dotenv[\s_-]*diff[\s_-]*ignore",
        r"(?i)/\*\s*dotenv[\s_-]*diff[\s_-]*ignore\s*\*/",
        r"(?i)<!--\s*dotenv[\s_-]*diff[\s_-]*ignore\s*-->",
        r"(?i)\bdotenv[\s_-]*diff[\s_-]*ignore\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Returns `true` if `line` contains an ignore marker.
///
/// Matching is case-insensitive and `-`, `_` and whitespace are
/// interchangeable between the words.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::has_ignore_comment;
///
/// assert!(has_ignore_comment("// dotenv-diff-ignore"));
/// assert!(has_ignore_comment("const k = process.env.KEY; /* DOTENV_DIFF_IGNORE */"));
/// assert!(!has_ignore_comment("const k = process.env.KEY;"));
/// ```
pub fn has_ignore_comment(line: &str) -> bool {
    IGNORE_MARKERS.iter().any(|re| re.is_match(line))
}

/// Returns `true` if the line at `index` (0-based) or the line above it is
/// annotated.
pub(crate) fn is_line_ignored(lines: &[&str], index: usize) -> bool {
    let current = lines.get(index).is_some_and(|l| has_ignore_comment(l));
    let previous = index
        .checked_sub(1)
        .and_then(|i| lines.get(i))
        .is_some_and(|l| has_ignore_comment(l));
    current || previous
}
