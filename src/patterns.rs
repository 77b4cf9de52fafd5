//! Pattern tables used by the secret detectors.
//!
//! Two kinds of patterns live here: value patterns for well-known provider
//! credentials ([`PROVIDER_PATTERNS`]) and name patterns for variables that
//! usually hold secrets ([`SensitiveKeyPatterns`]).

use once_cell::sync::Lazy;
use regex::Regex;

/// A named regex matching one provider's credential format.
pub struct ProviderPattern {
    /// Human-readable provider name, shown in findings.
    pub name: &'static str,
    /// The compiled value pattern.
    pub regex: Regex,
}

/// Known provider credential formats, most specific first.
pub static PROVIDER_PATTERNS: Lazy<Vec<ProviderPattern>> = Lazy::new(|| {
    [
        ("AWS access key id", r"\b(AKIA|ASIA)[0-9A-Z]{16}\b"),
        ("Stripe secret key", r"\bsk_(live|test)_[0-9a-zA-Z]{24,}"),
        ("Stripe restricted key", r"\brk_(live|test)_[0-9a-zA-Z]{24,}"),
        ("GitHub token", r"\bgh[pousr]_[A-Za-z0-9_]{36,255}"),
        ("GitHub fine-grained token", r"\bgithub_pat_[A-Za-z0-9_]{22,}"),
        ("Slack token", r"\bxox[baprs]-[A-Za-z0-9-]{10,}"),
        ("Google API key", r"\bAIza[0-9A-Za-z_-]{35}"),
        ("OpenAI API key", r"\bsk-(proj-)?[A-Za-z0-9_-]{40,}"),
        ("SendGrid API key", r"\bSG\.[A-Za-z0-9_-]{22}\.[A-Za-z0-9_-]{43}"),
        (
            "JSON Web Token",
            r"\beyJ[A-Za-z0-9_-]{10,}\.eyJ[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}",
        ),
        (
            "private key",
            r"-----BEGIN (RSA |EC |DSA |OPENSSH |PGP )?PRIVATE KEY( BLOCK)?-----",
        ),
    ]
    .into_iter()
    .map(|(name, re)| ProviderPattern {
        name,
        regex: Regex::new(re).expect("valid regex"),
    })
    .collect()
});

/// Returns the first provider pattern matching `value`.
pub fn match_provider(value: &str) -> Option<&'static ProviderPattern> {
    PROVIDER_PATTERNS.iter().find(|p| p.regex.is_match(value))
}

/// Name-based detection of variables that usually hold secrets.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::SensitiveKeyPatterns;
///
/// assert!(SensitiveKeyPatterns::is_sensitive("API_TOKEN"));
/// assert!(SensitiveKeyPatterns::is_sensitive("databasePassword"));
/// assert!(!SensitiveKeyPatterns::is_sensitive("PORT"));
/// assert!(!SensitiveKeyPatterns::is_sensitive("STRIPE_PUBLIC_KEY"));
/// ```
pub struct SensitiveKeyPatterns;

impl SensitiveKeyPatterns {
    /// Substrings (case-insensitive) that mark a name as sensitive, unless it
    /// also matches [`NEVER_SENSITIVE`](Self::NEVER_SENSITIVE).
    pub const SENSITIVE_PATTERNS: &'static [&'static str] = &[
        "TOKEN",
        "SECRET",
        "PASSWORD",
        "PASSWD",
        "PWD",
        "CREDENTIAL",
        "APIKEY",
        "API_KEY",
        "PRIVATE_KEY",
        "ACCESS_KEY",
        "_KEY",
        "AUTH",
    ];

    /// Names that look sensitive but hold public or non-secret values.
    pub const NEVER_SENSITIVE: &'static [&'static str] = &[
        "PUBLIC_KEY",
        "PUB_KEY",
        "PUBLISHABLE_KEY",
        "KEY_ID",
        "AUTH_URL",
        "AUTHOR",
        "TOKEN_URL",
        "SECRET_NAME",
    ];

    /// Returns `true` if `key` names a variable that likely holds a secret.
    ///
    /// camelCase names are normalized to UPPER_SNAKE_CASE first.
    pub fn is_sensitive(key: &str) -> bool {
        let key_upper = crate::naming::to_upper_snake_case(key);
        if Self::NEVER_SENSITIVE.iter().any(|p| key_upper.contains(p)) {
            return false;
        }
        Self::SENSITIVE_PATTERNS.iter().any(|p| key_upper.contains(p))
    }
}
