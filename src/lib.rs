#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::missing_safety_doc)]
#![doc = include_str!("../README.md")]

pub mod aggregate;
pub mod config;
pub mod detect;
pub mod diff;
pub mod duplicates;
pub mod entropy;
pub mod error;
pub mod expiration;
pub mod filter;
pub mod framework;
pub mod health;
pub mod loader;
pub mod naming;
pub mod parser;
pub mod patterns;
pub mod scanner;
pub mod secrets;
pub mod suppression;
pub mod t3env;

pub use crate::aggregate::{
    CompareOptions,
    CompareReport,
    ScanOptions,
    ScanReport,
    SourceFile,
    analyze_codebase,
    compare_env_files,
};
pub use crate::config::Config;
pub use crate::detect::{
    ProjectInfo,
    detect_project,
    parse_t3_env_schema,
};
pub use crate::diff::{
    DiffResult,
    ValueMismatch,
    diff_env,
};
pub use crate::duplicates::{
    Duplicate,
    find_duplicates,
};
pub use crate::entropy::shannon_entropy_normalized;
pub use crate::error::{
    LintError,
    LintResult,
};
pub use crate::expiration::{
    ExpireWarning,
    detect_env_expirations,
};
pub use crate::filter::KeyFilter;
pub use crate::framework::{
    Framework,
    FrameworkRules,
    FrameworkWarning,
    apply_framework_rules,
    is_client_component,
};
pub use crate::health::{
    HealthInputs,
    HealthWeights,
    Stats,
    calculate_stats,
    compute_health_score,
};
pub use crate::loader::ProjectLoader;
pub use crate::naming::{
    InconsistentNamingWarning,
    UppercaseWarning,
    detect_inconsistent_naming,
    detect_uppercase_keys,
};
pub use crate::parser::{
    EnvMap,
    parse_env,
};
pub use crate::patterns::SensitiveKeyPatterns;
pub use crate::scanner::{
    EnvUsage,
    SvelteKitModule,
    UsagePattern,
    scan_usages,
};
pub use crate::secrets::{
    ExampleSecretWarning,
    SecretFinding,
    SecretScanOptions,
    Severity,
    detect_secrets_in_example,
    detect_secrets_in_source,
};
pub use crate::suppression::has_ignore_comment;
pub use crate::t3env::{
    T3EnvSchema,
    T3EnvWarning,
    apply_t3_env_rules,
    check_t3_env_usages,
};
