//! Summary statistics and the 0–100 health score.
//!
//! The score is a linear defect model: start at 100 and subtract a weight
//! per finding. Weights are configuration, not calibrated constants.

use serde::{
    Deserialize,
    Serialize,
};

use crate::diff::DiffResult;
use crate::duplicates::{
    Duplicate,
    excess_occurrences,
};
use crate::parser::EnvMap;

/// Points subtracted per finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthWeights {
    /// Per high-severity secret.
    #[serde(default = "default_high_secret")]
    pub high_secret: u32,
    /// Per medium-severity secret.
    #[serde(default = "default_medium_secret")]
    pub medium_secret: u32,
    /// Per missing variable.
    #[serde(default = "default_missing")]
    pub missing: u32,
    /// Per uppercase naming warning.
    #[serde(default = "default_uppercase")]
    pub uppercase: u32,
    /// Per variable passed to a logging call.
    #[serde(default = "default_logged")]
    pub logged: u32,
    /// Per declared but unused variable.
    #[serde(default = "default_unused")]
    pub unused: u32,
    /// Per framework warning.
    #[serde(default = "default_framework")]
    pub framework: u32,
    /// Per secret-looking value in the example file.
    #[serde(default = "default_example_secret")]
    pub example_secret: u32,
    /// Per expiration warning.
    #[serde(default = "default_expiration")]
    pub expiration: u32,
    /// Per inconsistent naming pair.
    #[serde(default = "default_inconsistent")]
    pub inconsistent: u32,
}

fn default_high_secret() -> u32 {
    20
}
fn default_medium_secret() -> u32 {
    10
}
fn default_missing() -> u32 {
    20
}
fn default_uppercase() -> u32 {
    2
}
fn default_logged() -> u32 {
    10
}
fn default_unused() -> u32 {
    1
}
fn default_framework() -> u32 {
    5
}
fn default_example_secret() -> u32 {
    10
}
fn default_expiration() -> u32 {
    5
}
fn default_inconsistent() -> u32 {
    3
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            high_secret: default_high_secret(),
            medium_secret: default_medium_secret(),
            missing: default_missing(),
            uppercase: default_uppercase(),
            logged: default_logged(),
            unused: default_unused(),
            framework: default_framework(),
            example_secret: default_example_secret(),
            expiration: default_expiration(),
            inconsistent: default_inconsistent(),
        }
    }
}

/// Finding counts fed into [`compute_health_score`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthInputs {
    /// High-severity secrets.
    pub high_secrets: usize,
    /// Medium-severity secrets.
    pub medium_secrets: usize,
    /// Missing variables.
    pub missing: usize,
    /// Uppercase naming warnings.
    pub uppercase: usize,
    /// Logged variables.
    pub logged: usize,
    /// Unused variables.
    pub unused: usize,
    /// Framework and t3-env warnings.
    pub framework: usize,
    /// Example-file secrets.
    pub example_secrets: usize,
    /// Expiration warnings.
    pub expirations: usize,
    /// Inconsistent naming pairs.
    pub inconsistent: usize,
}

/// `100 - Σ weight × count`, clamped to `0..=100`.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::{
///     HealthInputs,
///     HealthWeights,
///     compute_health_score,
/// };
///
/// let weights = HealthWeights::default();
/// assert_eq!(compute_health_score(&HealthInputs::default(), &weights), 100);
///
/// let inputs = HealthInputs {
///     missing: 1,
///     unused: 3,
///     ..Default::default()
/// };
/// assert_eq!(compute_health_score(&inputs, &weights), 77);
/// ```
pub fn compute_health_score(inputs: &HealthInputs, weights: &HealthWeights) -> u8 {
    let terms = [
        (inputs.high_secrets, weights.high_secret),
        (inputs.medium_secrets, weights.medium_secret),
        (inputs.missing, weights.missing),
        (inputs.uppercase, weights.uppercase),
        (inputs.logged, weights.logged),
        (inputs.unused, weights.unused),
        (inputs.framework, weights.framework),
        (inputs.example_secrets, weights.example_secret),
        (inputs.expirations, weights.expiration),
        (inputs.inconsistent, weights.inconsistent),
    ];
    let penalty = terms.iter().fold(0u64, |acc, &(count, weight)| {
        acc.saturating_add((count as u64).saturating_mul(u64::from(weight)))
    });
    100u64.saturating_sub(penalty) as u8
}

/// Counts describing one comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Keys in the env file.
    pub env_count: usize,
    /// Keys in the example file.
    pub example_count: usize,
    /// Keys present in both.
    pub shared_count: usize,
    /// Redundant lines across both files' duplicates.
    pub duplicate_count: usize,
    /// Value mismatches.
    pub value_mismatch_count: usize,
    /// Usages found (scan mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<usize>,
    /// Distinct variables used (scan mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_variable_count: Option<usize>,
    /// Source files read (scan mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_scanned: Option<usize>,
}

/// Computes the compare-mode counts.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::{
///     calculate_stats,
///     diff_env,
///     find_duplicates,
///     parse_env,
/// };
///
/// let (env_raw, example_raw) = ("A=1\nB=2\nA=3\n", "A=\nC=\n");
/// let (env, example) = (parse_env(env_raw), parse_env(example_raw));
/// let diff = diff_env(&env, &example, false);
/// let stats = calculate_stats(
///     &env,
///     &example,
///     &find_duplicates(env_raw),
///     &find_duplicates(example_raw),
///     &diff,
/// );
/// assert_eq!((stats.env_count, stats.example_count, stats.shared_count), (2, 2, 1));
/// assert_eq!(stats.duplicate_count, 1);
/// ```
pub fn calculate_stats(
    env: &EnvMap,
    example: &EnvMap,
    env_duplicates: &[Duplicate],
    example_duplicates: &[Duplicate],
    diff: &DiffResult,
) -> Stats {
    Stats {
        env_count: env.len(),
        example_count: example.len(),
        shared_count: env.keys().filter(|k| example.contains_key(k)).count(),
        duplicate_count: excess_occurrences(env_duplicates)
            + excess_occurrences(example_duplicates),
        value_mismatch_count: diff.value_mismatches.len(),
        ..Default::default()
    }
}
