//! Best-effort parser for `.env`-style files.
//!
//! The format is deliberately flat: one `KEY=VALUE` per line, `#` comments,
//! no quoting, no escapes and no multi-line values. Anything that does not
//! look like an assignment is skipped without a warning.

use indexmap::IndexMap;
use serde::Serialize;

const BOM: char = '\u{feff}';

/// Ordered mapping from variable name to its literal value.
///
/// Keys are unique. When a key appears more than once the last value wins;
/// the key keeps the position of its first occurrence.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::parse_env;
///
/// let map = parse_env("A=1\nB=2\nA=3\n");
/// assert_eq!(map.get("A"), Some("3"));
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A", "B"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvMap(IndexMap<String, String>);

impl EnvMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key, replacing the value of an existing entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy that only keeps the keys accepted by `keep`.
    pub fn retain_keys(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(k, _)| keep(k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Splits a raw line into a trimmed `(key, value)` pair.
///
/// Returns `None` for blank lines, `#` comments, lines without `=` and lines
/// whose key is empty after trimming. Shared with the duplicate detector so
/// both agree on what counts as an assignment.
pub(crate) fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Iterates the lines of raw `.env` text with a leading byte order mark
/// removed from the first line.
pub(crate) fn env_lines(text: &str) -> impl Iterator<Item = &str> {
    text.trim_start_matches(BOM).lines()
}

/// Parses `.env` text into an [`EnvMap`].
///
/// Absent or unreadable files should be passed as the empty string; the
/// result is then an empty map.
pub fn parse_env(text: &str) -> EnvMap {
    let mut map = EnvMap::new();
    for line in env_lines(text) {
        if let Some((key, value)) = split_assignment(line) {
            map.insert(key, value);
        }
    }
    map
}
