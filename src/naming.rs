//! Naming convention checks over variable names.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static UPPER_SNAKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_]+$").expect("valid regex"));
static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));
static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// A name that is not UPPER_SNAKE_CASE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UppercaseWarning {
    /// The name as written.
    pub key: String,
    /// The UPPER_SNAKE_CASE form.
    pub suggestion: String,
}

/// Two names that only differ by underscores and letter case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InconsistentNamingWarning {
    /// First name of the pair, in input order.
    pub key1: String,
    /// Second name of the pair.
    pub key2: String,
    /// The variant to standardize on.
    pub suggestion: String,
}

/// Converts a name to UPPER_SNAKE_CASE.
///
/// Camel-case boundaries get an underscore, runs of dashes and whitespace
/// collapse into one underscore. Runs of capitals are left together, so
/// `URLParser` becomes `URLPARSER`.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::naming::to_upper_snake_case;
///
/// assert_eq!(to_upper_snake_case("apiKey"), "API_KEY");
/// assert_eq!(to_upper_snake_case("db-host name"), "DB_HOST_NAME");
/// assert_eq!(to_upper_snake_case("URLParser"), "URLPARSER");
/// ```
pub fn to_upper_snake_case(name: &str) -> String {
    let split = CAMEL_BOUNDARY.replace_all(name, "${1}_${2}");
    SEPARATOR_RUN.replace_all(&split, "_").to_uppercase()
}

/// Flags names that do not match `^[A-Z0-9_]+$`.
///
/// Each distinct name is reported once, in order of first appearance.
pub fn detect_uppercase_keys<'a, I>(keys: I) -> Vec<UppercaseWarning>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(*key))
        .filter(|key| !UPPER_SNAKE.is_match(key))
        .map(|key| UppercaseWarning {
            key: key.to_string(),
            suggestion: to_upper_snake_case(key),
        })
        .collect()
}

fn canonical(name: &str) -> String {
    name.replace('_', "").to_lowercase()
}

/// Flags pairs like `API_KEY` / `APIKEY` that are the same name written two
/// ways.
///
/// Every unordered pair is considered once; a visited set keyed by the
/// sorted pair keeps warnings unique. The suggestion is `key1` if it
/// contains an underscore, otherwise `key2`.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::detect_inconsistent_naming;
///
/// let warnings = detect_inconsistent_naming(&["API_KEY", "APIKEY", "PORT"]);
/// assert_eq!(warnings.len(), 1);
/// assert_eq!(warnings[0].suggestion, "API_KEY");
/// ```
pub fn detect_inconsistent_naming<S: AsRef<str>>(keys: &[S]) -> Vec<InconsistentNamingWarning> {
    let mut visited: HashSet<(&str, &str)> = HashSet::new();
    let mut warnings = Vec::new();

    for (i, first) in keys.iter().enumerate() {
        let key1 = first.as_ref();
        for (j, second) in keys.iter().enumerate() {
            let key2 = second.as_ref();
            if i == j || key1 == key2 {
                continue;
            }
            let pair = if key1 < key2 { (key1, key2) } else { (key2, key1) };
            if !visited.insert(pair) {
                continue;
            }
            if canonical(key1) == canonical(key2) {
                let suggestion = if key1.contains('_') { key1 } else { key2 };
                warnings.push(InconsistentNamingWarning {
                    key1: key1.to_string(),
                    key2: key2.to_string(),
                    suggestion: suggestion.to_string(),
                });
            }
        }
    }
    warnings
}
