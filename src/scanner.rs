//! Finds environment variable references in source text.
//!
//! Three access idioms are recognized, each described by a [`UsagePattern`]
//! and a regex in a single declarative table. Matches are reported per
//! pattern in declaration order, then in document order.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{
    Captures,
    Regex,
};
use serde::Serialize;

use crate::suppression::is_line_ignored;

/// The access idiom a usage was found through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UsagePattern {
    /// `process.env.NAME`
    #[serde(rename = "process.env")]
    ProcessEnv,
    /// `import.meta.env.NAME`
    #[serde(rename = "import.meta.env")]
    ImportMetaEnv,
    /// `$env/(static|dynamic)/(private|public)/NAME`
    #[serde(rename = "sveltekit")]
    SvelteKit,
}

impl UsagePattern {
    /// The name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessEnv => "process.env",
            Self::ImportMetaEnv => "import.meta.env",
            Self::SvelteKit => "sveltekit",
        }
    }
}

impl fmt::Display for UsagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The SvelteKit `$env` module a variable was referenced through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SvelteKitModule {
    /// `$env/static/private`
    #[serde(rename = "$env/static/private")]
    StaticPrivate,
    /// `$env/static/public`
    #[serde(rename = "$env/static/public")]
    StaticPublic,
    /// `$env/dynamic/private`
    #[serde(rename = "$env/dynamic/private")]
    DynamicPrivate,
    /// `$env/dynamic/public`
    #[serde(rename = "$env/dynamic/public")]
    DynamicPublic,
}

impl SvelteKitModule {
    fn from_parts(kind: &str, scope: &str) -> Option<Self> {
        match (kind, scope) {
            ("static", "private") => Some(Self::StaticPrivate),
            ("static", "public") => Some(Self::StaticPublic),
            ("dynamic", "private") => Some(Self::DynamicPrivate),
            ("dynamic", "public") => Some(Self::DynamicPublic),
            _ => None,
        }
    }

    /// The import path, e.g. `$env/static/private`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaticPrivate => "$env/static/private",
            Self::StaticPublic => "$env/static/public",
            Self::DynamicPrivate => "$env/dynamic/private",
            Self::DynamicPublic => "$env/dynamic/public",
        }
    }

    /// `true` for the two `static` modules.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::StaticPrivate | Self::StaticPublic)
    }

    /// `true` for the two `public` modules.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::StaticPublic | Self::DynamicPublic)
    }
}

/// One reference to an environment variable in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvUsage {
    /// Variable name.
    pub variable: String,
    /// Path of the file, relative to the scan root.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// Access idiom.
    pub pattern: UsagePattern,
    /// The matched line, trimmed.
    pub context: String,
    /// The line also passes something to a `console.*` logging call.
    pub is_logged: bool,
    /// SvelteKit module, only set for [`UsagePattern::SvelteKit`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<SvelteKitModule>,
}

type Extractor = fn(&Captures<'_>) -> Option<(String, Option<SvelteKitModule>)>;

struct AccessPattern {
    pattern: UsagePattern,
    regex: Regex,
    extract: Extractor,
}

fn capture_name(caps: &Captures<'_>) -> Option<(String, Option<SvelteKitModule>)> {
    caps.get(1).map(|m| (m.as_str().to_string(), None))
}

fn capture_sveltekit(caps: &Captures<'_>) -> Option<(String, Option<SvelteKitModule>)> {
    let module = SvelteKitModule::from_parts(caps.get(1)?.as_str(), caps.get(2)?.as_str());
    caps.get(3).map(|m| (m.as_str().to_string(), module))
}

static ACCESS_PATTERNS: Lazy<Vec<AccessPattern>> = Lazy::new(|| {
    let table: [(UsagePattern, &str, Extractor); 3] = [
        (
            UsagePattern::ProcessEnv,
            r"process\.env\.([A-Z_][A-Z0-9_]*)\b",
            capture_name,
        ),
        (
            UsagePattern::ImportMetaEnv,
            r"import\.meta\.env\.([A-Z_][A-Z0-9_]*)\b",
            capture_name,
        ),
        (
            UsagePattern::SvelteKit,
            r"\$env/(static|dynamic)/(private|public)/([A-Za-z_][A-Za-z0-9_]*)",
            capture_sveltekit,
        ),
    ];
    table
        .into_iter()
        .map(|(pattern, re, extract)| AccessPattern {
            pattern,
            regex: Regex::new(re).expect("valid regex"),
            extract,
        })
        .collect()
});

static CONSOLE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"console\.(log|error|warn|info|debug)\s*\(").expect("valid regex"));

/// Byte offsets at which each line starts.
fn line_starts(content: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(content.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Scans `content` for environment variable references.
///
/// `file` is recorded as-is on every usage, so callers should pass the path
/// relative to the scan root. Occurrences annotated with
/// `dotenv-diff-ignore` (on the line or the line above) are dropped.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::{
///     UsagePattern,
///     scan_usages,
/// };
///
/// let usages = scan_usages("src/db.ts", "const url = process.env.DATABASE_URL;\n");
/// assert_eq!(usages.len(), 1);
/// assert_eq!(usages[0].variable, "DATABASE_URL");
/// assert_eq!(usages[0].pattern, UsagePattern::ProcessEnv);
/// assert_eq!((usages[0].line, usages[0].column), (1, 13));
/// ```
pub fn scan_usages(file: &str, content: &str) -> Vec<EnvUsage> {
    let starts = line_starts(content);
    let lines: Vec<&str> = content.split('\n').collect();
    let mut usages = Vec::new();

    for access in ACCESS_PATTERNS.iter() {
        for caps in access.regex.captures_iter(content) {
            let Some(whole) = caps.get(0) else { continue };
            let Some((variable, module)) = (access.extract)(&caps) else {
                continue;
            };
            let offset = whole.start();
            let line_idx = starts.partition_point(|&s| s <= offset) - 1;
            if is_line_ignored(&lines, line_idx) {
                continue;
            }
            let line_text = lines.get(line_idx).copied().unwrap_or_default();
            let column = content[starts[line_idx]..offset].chars().count() + 1;
            usages.push(EnvUsage {
                variable,
                file: file.to_string(),
                line: line_idx + 1,
                column,
                pattern: access.pattern,
                context: line_text.trim().to_string(),
                is_logged: CONSOLE_CALL.is_match(line_text),
                module,
            });
        }
    }
    usages
}
