//! `@expire YYYY-MM-DD` annotations in env files.
//!
//! ```text
//! # @expire 2025-06-30
//! PARTNER_API_KEY=...
//! ```
//!
//! An annotation applies to the first assignment that follows it and to
//! nothing else.

use chrono::{
    DateTime,
    NaiveDate,
    Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parser::env_lines;

const MILLIS_PER_DAY: i64 = 86_400_000;

static EXPIRE_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:#|//)?\s*@?expire\s+(\d{4}-\d{2}-\d{2})").expect("valid regex")
});
static ENV_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)=").expect("valid regex"));

/// A variable with an expiration date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpireWarning {
    /// Variable name.
    pub key: String,
    /// The annotated date, `yyyy-mm-dd`.
    pub date: String,
    /// Whole days until expiry; negative once expired.
    pub days_left: i64,
}

/// Days from `now` until midnight UTC of `date`, rounded up.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expires = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (expires - now).num_milliseconds();
    (millis as f64 / MILLIS_PER_DAY as f64).ceil() as i64
}

/// Like [`detect_env_expirations`], evaluated at a fixed point in time.
///
/// # Examples
///
/// ```rust
/// use chrono::{
///     TimeZone,
///     Utc,
/// };
/// use dotenv_diff::expiration::detect_env_expirations_at;
///
/// let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
/// let warnings = detect_env_expirations_at("# @expire 2024-12-31\nAPI_KEY=123\n", now);
/// assert_eq!(warnings[0].key, "API_KEY");
/// assert_eq!(warnings[0].days_left, 30);
/// ```
pub fn detect_env_expirations_at(raw: &str, now: DateTime<Utc>) -> Vec<ExpireWarning> {
    let mut pending: Option<NaiveDate> = None;
    let mut warnings = Vec::new();

    for line in env_lines(raw) {
        let line = line.trim();
        if let Some(caps) = EXPIRE_ANNOTATION.captures(line) {
            pending = caps
                .get(1)
                .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());
            continue;
        }
        if let Some(caps) = ENV_ASSIGNMENT.captures(line)
            && let Some(date) = pending.take()
            && let Some(key) = caps.get(1)
        {
            warnings.push(ExpireWarning {
                key: key.as_str().to_string(),
                date: date.format("%Y-%m-%d").to_string(),
                days_left: days_until(date, now),
            });
        }
    }
    warnings
}

/// Finds annotated variables and computes their days left from the current
/// time.
pub fn detect_env_expirations(raw: &str) -> Vec<ExpireWarning> {
    detect_env_expirations_at(raw, Utc::now())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn dec_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_annotation_above_key() {
        let warnings =
            detect_env_expirations_at("# @expire 2024-12-31\nAPI_KEY=123\n", dec_first());
        assert_eq!(
            warnings,
            vec![ExpireWarning {
                key: "API_KEY".to_string(),
                date: "2024-12-31".to_string(),
                days_left: 30,
            }]
        );
    }

    #[test]
    fn test_only_first_key_gets_the_annotation() {
        let raw = "# @expire 2024-12-31\nA=1\nB=2\n";
        let warnings = detect_env_expirations_at(raw, dec_first());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "A");
    }

    #[test]
    fn test_annotation_forms() {
        let raw = "// expire 2024-12-11\nA=1\n@expire 2024-12-02\nB=1\nEXPIRE 2024-12-03\nC=1\n";
        let got: Vec<_> = detect_env_expirations_at(raw, dec_first())
            .into_iter()
            .map(|w| (w.key, w.days_left))
            .collect();
        assert_eq!(
            got,
            vec![
                ("A".to_string(), 10),
                ("B".to_string(), 1),
                ("C".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_comments_between_annotation_and_key_keep_it_pending() {
        let raw = "# @expire 2024-12-31\n# rotated by ops\n\nTOKEN=x\n";
        let warnings = detect_env_expirations_at(raw, dec_first());
        assert_eq!(warnings[0].key, "TOKEN");
    }

    #[test]
    fn test_expired_and_same_day() {
        let raw = "# @expire 2024-11-21\nOLD=1\n# @expire 2024-12-01\nTODAY=1\n";
        let warnings = detect_env_expirations_at(raw, dec_first());
        assert_eq!(warnings[0].days_left, -10);
        assert_eq!(warnings[1].days_left, 0);
    }

    #[test]
    fn test_partial_days_round_up() {
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 18, 0, 0).unwrap();
        let warnings = detect_env_expirations_at("# @expire 2024-12-31\nK=1\n", now);
        assert_eq!(warnings[0].days_left, 30);
    }

    #[test]
    fn test_invalid_dates_are_ignored() {
        let raw = "# @expire 2024-13-45\nK=1\n";
        assert!(detect_env_expirations_at(raw, dec_first()).is_empty());
    }

    #[test]
    fn test_key_without_annotation() {
        assert!(detect_env_expirations_at("K=1\n", dec_first()).is_empty());
    }
}
