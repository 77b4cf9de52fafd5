//! Error types for dotenv-diff operations.
//!
//! The detection engine itself is total: empty or missing input degrades to
//! empty results. Errors only come from option normalization and the
//! file-system glue around the engine.

use thiserror::Error;

/// A specialized `Result` type for dotenv-diff operations.
pub type LintResult<T> = Result<T, LintError>;

/// Errors that can occur while preparing a lint run.
#[derive(Debug, Error)]
pub enum LintError {
    /// Failed to read the configuration file.
    #[error("config read failed for {path}: {reason}")]
    ConfigReadFailed {
        /// The path to the file that couldn't be read.
        path: String,
        /// The reason for the failure.
        reason: String,
    },

    /// The configuration file is not valid JSON or has unexpected fields.
    #[error("config parse failed for {path}: {reason}")]
    ConfigParseFailed {
        /// The path to the file that couldn't be parsed.
        path: String,
        /// The reason for the failure.
        reason: String,
    },

    /// An ignore regex supplied by the user does not compile.
    #[error("invalid ignore regex '{pattern}': {reason}")]
    InvalidIgnoreRegex {
        /// The pattern as written by the user.
        pattern: String,
        /// The compiler error.
        reason: String,
    },

    /// The directory to scan does not exist.
    #[error("source root not found: {path}")]
    SourceRootNotFound {
        /// The missing directory.
        path: String,
    },

    /// A severity name other than `low`, `medium` or `high`.
    #[error("invalid severity: {0} (expected low, medium or high)")]
    InvalidSeverity(String),
}
