//! Runs every check over one env/example pair or one codebase and assembles
//! the report.

use chrono::{
    DateTime,
    Utc,
};
use indexmap::IndexSet;
use serde::Serialize;

use crate::detect::ProjectInfo;
use crate::diff::{
    DiffResult,
    diff_env,
};
use crate::duplicates::{
    Duplicate,
    find_duplicates,
};
use crate::expiration::{
    ExpireWarning,
    detect_env_expirations_at,
};
use crate::filter::KeyFilter;
use crate::framework::{
    Framework,
    FrameworkRules,
    FrameworkWarning,
    is_client_component,
};
use crate::health::{
    HealthInputs,
    HealthWeights,
    Stats,
    calculate_stats,
    compute_health_score,
};
use crate::naming::{
    InconsistentNamingWarning,
    UppercaseWarning,
    detect_inconsistent_naming,
    detect_uppercase_keys,
};
use crate::parser::{
    EnvMap,
    parse_env,
};
use crate::scanner::{
    EnvUsage,
    scan_usages,
};
use crate::secrets::{
    ExampleSecretWarning,
    SecretFinding,
    SecretScanOptions,
    Severity,
    detect_secrets_in_example,
    detect_secrets_in_source,
};
use crate::t3env::{
    T3EnvSchema,
    T3EnvWarning,
    apply_t3_env_rules,
};

/// Settings for [`compare_env_files`].
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Also compare values of shared keys.
    pub check_values: bool,
    /// Keys excluded from every check.
    pub filter: KeyFilter,
    /// Health score weights.
    pub weights: HealthWeights,
    /// Reference time for `@expire` annotations; the current time when unset.
    pub now: Option<DateTime<Utc>>,
}

/// Everything found by comparing an env file with its example.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport {
    /// Missing, extra and mismatched keys.
    #[serde(flatten)]
    pub diff: DiffResult,
    /// Repeated keys in the env file.
    pub env_duplicates: Vec<Duplicate>,
    /// Repeated keys in the example file.
    pub example_duplicates: Vec<Duplicate>,
    /// Keys of the env file with an empty value.
    pub empty_keys: Vec<String>,
    /// Names that are not UPPER_SNAKE_CASE.
    pub uppercase_warnings: Vec<UppercaseWarning>,
    /// Names written two different ways.
    pub inconsistent_naming: Vec<InconsistentNamingWarning>,
    /// Real-looking credentials in the example file.
    pub example_secrets: Vec<ExampleSecretWarning>,
    /// `@expire` annotations in the env file.
    pub expirations: Vec<ExpireWarning>,
    /// Summary counts.
    pub stats: Stats,
    /// 0–100.
    pub health_score: u8,
}

impl CompareReport {
    /// `true` when the run should fail a CI check: missing keys or a high
    /// severity secret.
    pub fn has_errors(&self) -> bool {
        !self.diff.missing.is_empty()
            || self
                .example_secrets
                .iter()
                .any(|s| s.severity == Severity::High)
    }

    /// `true` when anything at all was reported.
    pub fn has_warnings(&self) -> bool {
        !self.diff.is_clean()
            || !self.env_duplicates.is_empty()
            || !self.example_duplicates.is_empty()
            || !self.empty_keys.is_empty()
            || !self.uppercase_warnings.is_empty()
            || !self.inconsistent_naming.is_empty()
            || !self.example_secrets.is_empty()
            || !self.expirations.is_empty()
    }
}

fn filter_duplicates(duplicates: Vec<Duplicate>, filter: &KeyFilter) -> Vec<Duplicate> {
    duplicates
        .into_iter()
        .filter(|d| !filter.is_ignored(&d.key))
        .collect()
}

fn filter_expirations(
    raw: &str,
    filter: &KeyFilter,
    now: Option<DateTime<Utc>>,
) -> Vec<ExpireWarning> {
    detect_env_expirations_at(raw, now.unwrap_or_else(Utc::now))
        .into_iter()
        .filter(|w| !filter.is_ignored(&w.key))
        .collect()
}

fn count_severity(findings: &[SecretFinding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

/// Compares an env file against its example.
///
/// Both texts are parsed and filtered through `opts.filter` before any
/// check runs, so an ignored key never shows up anywhere in the report.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::{
///     CompareOptions,
///     compare_env_files,
/// };
///
/// let report = compare_env_files("A=1\nC=3\n", "A=\nB=\n", &CompareOptions::default());
/// assert_eq!(report.diff.missing, vec!["B"]);
/// assert_eq!(report.diff.extra, vec!["C"]);
/// assert_eq!(report.health_score, 80);
/// ```
pub fn compare_env_files(
    env_text: &str,
    example_text: &str,
    opts: &CompareOptions,
) -> CompareReport {
    let env = opts.filter.apply(&parse_env(env_text));
    let example = opts.filter.apply(&parse_env(example_text));
    log::debug!(
        "comparing {} env keys against {} example keys",
        env.len(),
        example.len()
    );

    let diff = diff_env(&env, &example, opts.check_values);
    let env_duplicates = filter_duplicates(find_duplicates(env_text), &opts.filter);
    let example_duplicates = filter_duplicates(find_duplicates(example_text), &opts.filter);
    let empty_keys = env
        .iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k.to_string())
        .collect();

    let all_keys: IndexSet<&str> = env.keys().chain(example.keys()).collect();
    let all_keys: Vec<&str> = all_keys.into_iter().collect();
    let uppercase_warnings = detect_uppercase_keys(all_keys.iter().copied());
    let inconsistent_naming = detect_inconsistent_naming(&all_keys);

    let example_secrets = detect_secrets_in_example(&example);
    let expirations = filter_expirations(env_text, &opts.filter, opts.now);
    let stats = calculate_stats(&env, &example, &env_duplicates, &example_duplicates, &diff);

    let inputs = HealthInputs {
        missing: diff.missing.len(),
        uppercase: uppercase_warnings.len(),
        example_secrets: example_secrets.len(),
        expirations: expirations.len(),
        inconsistent: inconsistent_naming.len(),
        ..Default::default()
    };
    let health_score = compute_health_score(&inputs, &opts.weights);
    log::info!(
        "compare finished: {} missing, {} extra, health {}",
        diff.missing.len(),
        diff.extra.len(),
        health_score
    );

    CompareReport {
        diff,
        env_duplicates,
        example_duplicates,
        empty_keys,
        uppercase_warnings,
        inconsistent_naming,
        example_secrets,
        expirations,
        stats,
        health_score,
    }
}

/// A source file to scan, with its path relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Relative path, recorded on usages and findings.
    pub path: String,
    /// File content.
    pub content: String,
}

impl SourceFile {
    /// Creates a source file.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Settings for [`analyze_codebase`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Also compare values against the example.
    pub check_values: bool,
    /// Keys excluded from every check.
    pub filter: KeyFilter,
    /// Source secrets below this severity are dropped.
    pub min_severity: Severity,
    /// Thresholds for the source secret detector.
    pub secret_options: SecretScanOptions,
    /// Framework rules to apply.
    pub framework: Framework,
    /// t3-env schema, when the project uses one.
    pub t3_schema: Option<T3EnvSchema>,
    /// Health score weights.
    pub weights: HealthWeights,
    /// Reference time for `@expire` annotations; the current time when unset.
    pub now: Option<DateTime<Utc>>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            check_values: false,
            filter: KeyFilter::default(),
            min_severity: Severity::Low,
            secret_options: SecretScanOptions::default(),
            framework: Framework::Unknown,
            t3_schema: None,
            weights: HealthWeights::default(),
            now: None,
        }
    }
}

impl ScanOptions {
    /// Takes the framework from detected project info.
    pub fn with_project(mut self, project: &ProjectInfo) -> Self {
        self.framework = project.framework;
        self
    }
}

/// Everything found by scanning a codebase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Every usage found, minus ignored variables.
    pub usages: Vec<EnvUsage>,
    /// Used variables the env file does not declare, in first-use order.
    pub missing: Vec<String>,
    /// Declared variables never used.
    pub unused: Vec<String>,
    /// Hard-coded credentials in source.
    pub secrets: Vec<SecretFinding>,
    /// Usages on a line that also calls `console.*`.
    pub logged: Vec<EnvUsage>,
    /// Used names that are not UPPER_SNAKE_CASE.
    pub uppercase_warnings: Vec<UppercaseWarning>,
    /// Framework convention violations.
    pub framework_warnings: Vec<FrameworkWarning>,
    /// t3-env schema violations.
    pub t3_env_warnings: Vec<T3EnvWarning>,
    /// Real-looking credentials in the example file.
    pub example_secrets: Vec<ExampleSecretWarning>,
    /// `@expire` annotations in the env file.
    pub expirations: Vec<ExpireWarning>,
    /// Repeated keys in the env file.
    pub duplicates: Vec<Duplicate>,
    /// Env names written two different ways.
    pub inconsistent_naming: Vec<InconsistentNamingWarning>,
    /// Env file against the example, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_diff: Option<DiffResult>,
    /// Summary counts.
    pub stats: Stats,
    /// 0–100.
    pub health_score: u8,
}

impl ScanReport {
    /// `true` when the run should fail a CI check: missing variables or a
    /// high severity secret.
    pub fn has_errors(&self) -> bool {
        !self.missing.is_empty()
            || self.secrets.iter().any(|s| s.severity == Severity::High)
            || self
                .example_secrets
                .iter()
                .any(|s| s.severity == Severity::High)
    }

    /// `true` when anything at all was reported.
    pub fn has_warnings(&self) -> bool {
        !self.missing.is_empty()
            || !self.unused.is_empty()
            || !self.secrets.is_empty()
            || !self.logged.is_empty()
            || !self.uppercase_warnings.is_empty()
            || !self.framework_warnings.is_empty()
            || !self.t3_env_warnings.is_empty()
            || !self.example_secrets.is_empty()
            || !self.expirations.is_empty()
            || !self.duplicates.is_empty()
            || !self.inconsistent_naming.is_empty()
            || self.example_diff.as_ref().is_some_and(|d| !d.is_clean())
    }
}

/// Scans `files` and checks what they use against the env file, and the env
/// file against its example when one is given.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::{
///     ScanOptions,
///     SourceFile,
///     analyze_codebase,
/// };
///
/// let files = vec![SourceFile::new(
///     "src/db.ts",
///     "connect(process.env.DATABASE_URL, process.env.DB_POOL);",
/// )];
/// let report = analyze_codebase(&files, "DATABASE_URL=x\nPORT=3000\n", None, &ScanOptions::default());
/// assert_eq!(report.missing, vec!["DB_POOL"]);
/// assert_eq!(report.unused, vec!["PORT"]);
/// ```
pub fn analyze_codebase(
    files: &[SourceFile],
    env_text: &str,
    example_text: Option<&str>,
    opts: &ScanOptions,
) -> ScanReport {
    let filter = &opts.filter;
    let env = filter.apply(&parse_env(env_text));
    let example = example_text.map(|text| filter.apply(&parse_env(text)));

    let mut rules = FrameworkRules::new(opts.framework);
    let mut usages = Vec::new();
    let mut secrets = Vec::new();
    for file in files {
        if opts.framework == Framework::NextJs && is_client_component(&file.content) {
            rules.client_files.insert(file.path.clone());
        }
        usages.extend(
            scan_usages(&file.path, &file.content)
                .into_iter()
                .filter(|u| !filter.is_ignored(&u.variable)),
        );
        secrets.extend(
            detect_secrets_in_source(&file.path, &file.content, &opts.secret_options)
                .into_iter()
                .filter(|s| s.severity >= opts.min_severity)
                .filter(|s| !s.key.as_deref().is_some_and(|k| filter.is_ignored(k))),
        );
    }
    log::debug!(
        "found {} usages and {} secrets in {} files",
        usages.len(),
        secrets.len(),
        files.len()
    );

    let used: IndexSet<&str> = usages.iter().map(|u| u.variable.as_str()).collect();
    let missing: Vec<String> = used
        .iter()
        .filter(|v| !env.contains_key(v))
        .map(|v| v.to_string())
        .collect();
    let unused: Vec<String> = env
        .keys()
        .filter(|k| !used.contains(k))
        .map(str::to_string)
        .collect();

    let logged: Vec<EnvUsage> = usages.iter().filter(|u| u.is_logged).cloned().collect();
    let uppercase_warnings = detect_uppercase_keys(used.iter().copied());

    let mut framework_warnings = Vec::new();
    let mut t3_env_warnings = Vec::new();
    for usage in &usages {
        rules.apply(usage, &mut framework_warnings);
        if let Some(schema) = &opts.t3_schema {
            apply_t3_env_rules(usage, schema, &mut t3_env_warnings);
        }
    }

    let example_secrets = example
        .as_ref()
        .map(detect_secrets_in_example)
        .unwrap_or_default();
    let expirations = filter_expirations(env_text, filter, opts.now);
    let duplicates = filter_duplicates(find_duplicates(env_text), filter);
    let env_keys: Vec<&str> = env.keys().collect();
    let inconsistent_naming = detect_inconsistent_naming(&env_keys);

    let example_diff = example
        .as_ref()
        .map(|example| diff_env(&env, example, opts.check_values));
    let example_duplicates = example_text
        .map(|text| filter_duplicates(find_duplicates(text), filter))
        .unwrap_or_default();
    let empty = EnvMap::new();
    let mut stats = calculate_stats(
        &env,
        example.as_ref().unwrap_or(&empty),
        &duplicates,
        &example_duplicates,
        &example_diff.clone().unwrap_or_default(),
    );
    stats.usage_count = Some(usages.len());
    stats.unique_variable_count = Some(used.len());
    stats.files_scanned = Some(files.len());

    let inputs = HealthInputs {
        high_secrets: count_severity(&secrets, Severity::High),
        medium_secrets: count_severity(&secrets, Severity::Medium),
        missing: missing.len(),
        uppercase: uppercase_warnings.len(),
        logged: logged.len(),
        unused: unused.len(),
        framework: framework_warnings.len() + t3_env_warnings.len(),
        example_secrets: example_secrets.len(),
        expirations: expirations.len(),
        inconsistent: inconsistent_naming.len(),
    };
    let health_score = compute_health_score(&inputs, &opts.weights);
    log::info!(
        "scan finished: {} missing, {} unused, health {}",
        missing.len(),
        unused.len(),
        health_score
    );

    ScanReport {
        usages,
        missing,
        unused,
        secrets,
        logged,
        uppercase_warnings,
        framework_warnings,
        t3_env_warnings,
        example_secrets,
        expirations,
        duplicates,
        inconsistent_naming,
        example_diff,
        stats,
        health_score,
    }
}
