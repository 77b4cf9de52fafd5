//! Key-set comparison between an env file and its example.

use serde::Serialize;

use crate::parser::EnvMap;

/// A shared key whose value differs from the example's non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueMismatch {
    /// Variable name.
    pub key: String,
    /// Value in the example file.
    pub expected: String,
    /// Value in the env file.
    pub actual: String,
}

/// Result of comparing two [`EnvMap`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Keys of the example that the current file lacks, in example order.
    pub missing: Vec<String>,
    /// Keys of the current file that the example lacks, in current order.
    pub extra: Vec<String>,
    /// Value mismatches, in example order. Empty unless values are checked.
    pub value_mismatches: Vec<ValueMismatch>,
}

impl DiffResult {
    /// `true` if nothing is missing, extra or mismatched.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.value_mismatches.is_empty()
    }
}

/// Compares `current` against `example`.
///
/// With `check_values`, shared keys are compared by exact string equality.
/// An example value that is empty after trimming acts as a placeholder and
/// accepts any value.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::{
///     diff_env,
///     parse_env,
/// };
///
/// let current = parse_env("A=1\nB=2\nC=3\n");
/// let example = parse_env("A=\nB=\nD=\n");
/// let diff = diff_env(&current, &example, false);
/// assert_eq!(diff.missing, vec!["D"]);
/// assert_eq!(diff.extra, vec!["C"]);
/// ```
pub fn diff_env(current: &EnvMap, example: &EnvMap, check_values: bool) -> DiffResult {
    let missing = example
        .keys()
        .filter(|k| !current.contains_key(k))
        .map(str::to_string)
        .collect();
    let extra = current
        .keys()
        .filter(|k| !example.contains_key(k))
        .map(str::to_string)
        .collect();

    let value_mismatches = if check_values {
        example
            .iter()
            .filter(|(_, expected)| !expected.trim().is_empty())
            .filter_map(|(key, expected)| {
                let actual = current.get(key)?;
                (actual != expected).then(|| ValueMismatch {
                    key: key.to_string(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    DiffResult {
        missing,
        extra,
        value_mismatches,
    }
}
