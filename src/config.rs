//! Optional `dotenv-diff.config.json` project configuration.
//!
//! Every field is optional; command-line flags override whatever the file
//! sets.

use std::fs;
use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use serde::Deserialize;

use crate::error::{
    LintError,
    LintResult,
};
use crate::health::HealthWeights;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "dotenv-diff.config.json";

/// Settings read from the config file.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::Config;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_json(r#"{"checkValues": true, "ignore": ["NODE_ENV"]}"#)?;
/// assert_eq!(config.check_values, Some(true));
/// assert_eq!(config.ignore, vec!["NODE_ENV"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Env file path.
    #[serde(default)]
    pub env: Option<PathBuf>,
    /// Example file path.
    #[serde(default)]
    pub example: Option<PathBuf>,
    /// Compare values of shared keys.
    #[serde(default)]
    pub check_values: Option<bool>,
    /// Exact names to ignore.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Patterns of names to ignore.
    #[serde(default)]
    pub ignore_regex: Vec<String>,
    /// Extra directory names to skip while scanning.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Source file extensions to scan, without the dot.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Minimum severity of reported source secrets.
    #[serde(default)]
    pub min_severity: Option<String>,
    /// Fail on any warning.
    #[serde(default)]
    pub strict: Option<bool>,
    /// Path of a t3-env schema file.
    #[serde(default)]
    pub t3_schema: Option<PathBuf>,
    /// Health score weights.
    #[serde(default)]
    pub health_weights: Option<HealthWeights>,
}

impl Config {
    /// Parses config JSON. `source` names the origin in errors.
    fn parse(contents: &str, source: &str) -> LintResult<Self> {
        serde_json::from_str(contents).map_err(|e| LintError::ConfigParseFailed {
            path: source.to_string(),
            reason: e.to_string(),
        })
    }

    /// Parses config JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::ConfigParseFailed`] for invalid JSON or unknown
    /// fields.
    pub fn from_json(contents: &str) -> LintResult<Self> {
        Self::parse(contents, "<inline>")
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::ConfigReadFailed`] if the file cannot be read and
    /// [`LintError::ConfigParseFailed`] if it is not a valid config.
    pub fn load(path: &Path) -> LintResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| LintError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::parse(&contents, &path.display().to_string())?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `dotenv-diff.config.json` from `dir` if it exists.
    ///
    /// A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for a file that exists.
    pub fn discover(dir: &Path) -> LintResult<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        match fs::metadata(&path) {
            Ok(_) => Self::load(&path).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No {} in {}", CONFIG_FILE_NAME, dir.display());
                Ok(None)
            }
            Err(e) => {
                log::warn!("Failed to read config file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}
