//! User-supplied key exclusions.

use regex::Regex;

use crate::error::{
    LintError,
    LintResult,
};
use crate::parser::EnvMap;

/// Keys excluded from every check, by exact name or by regex.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::KeyFilter;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let filter = KeyFilter::new(&["NODE_ENV"], &["^VERCEL_"])?;
/// assert!(filter.is_ignored("NODE_ENV"));
/// assert!(filter.is_ignored("VERCEL_URL"));
/// assert!(!filter.is_ignored("DATABASE_URL"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyFilter {
    /// Exact names.
    pub ignore: Vec<String>,
    /// Compiled patterns.
    pub ignore_regex: Vec<Regex>,
}

impl KeyFilter {
    /// Builds a filter, compiling each pattern.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InvalidIgnoreRegex`] for the first pattern that
    /// does not compile.
    pub fn new<S: AsRef<str>, R: AsRef<str>>(ignore: &[S], ignore_regex: &[R]) -> LintResult<Self> {
        let ignore_regex = ignore_regex
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|e| LintError::InvalidIgnoreRegex {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<LintResult<Vec<_>>>()?;
        Ok(Self {
            ignore: ignore.iter().map(|s| s.as_ref().to_string()).collect(),
            ignore_regex,
        })
    }

    /// `true` when `key` matches an exact name or any pattern.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore.iter().any(|k| k == key) || self.ignore_regex.iter().any(|re| re.is_match(key))
    }

    /// `true` when nothing is ignored.
    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty() && self.ignore_regex.is_empty()
    }

    /// Drops ignored keys from `map`.
    pub fn apply(&self, map: &EnvMap) -> EnvMap {
        map.retain_keys(|key| !self.is_ignored(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_env;

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = KeyFilter::new::<&str, &str>(&[], &["(unclosed"]).unwrap_err();
        match err {
            LintError::InvalidIgnoreRegex { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apply_keeps_order() {
        let filter = KeyFilter::new(&["B"], &["^TMP_"]).unwrap();
        let map = filter.apply(&parse_env("A=1\nTMP_X=2\nB=3\nC=4\n"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    #[test]
    fn test_empty_filter_ignores_nothing() {
        let filter = KeyFilter::default();
        assert!(filter.is_empty());
        assert!(!filter.is_ignored(""));
    }
}
