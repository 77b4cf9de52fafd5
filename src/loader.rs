//! File-system access around the detection engine.
//!
//! Everything here degrades gracefully: an absent env file is empty text and
//! an unreadable source file is skipped with a warning. Only a missing scan
//! root is an error.

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use walkdir::{
    DirEntry,
    WalkDir,
};

use crate::aggregate::SourceFile;
use crate::error::{
    LintError,
    LintResult,
};

/// Directories never scanned.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    ".svelte-kit",
];

/// Source extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "mjs", "cjs", "svelte", "vue"];

/// Conventional locations of a t3-env schema, relative to the project root.
pub const T3_SCHEMA_CANDIDATES: &[&str] = &[
    "src/env.mjs",
    "src/env.ts",
    "src/env.js",
    "env.mjs",
    "env.ts",
    "env.js",
];

/// Reads a text file, treating an absent or unreadable file as empty.
pub fn read_text(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} not found, using empty content", path.display());
            String::new()
        }
        Err(e) => {
            log::debug!("{} unreadable ({}), using empty content", path.display(), e);
            String::new()
        }
    }
}

/// Finds `filename` in `dir` ignoring letter case.
pub fn find_file_case_insensitive(dir: &Path, filename: &str) -> Option<PathBuf> {
    let target = filename.to_lowercase();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_string_lossy().to_lowercase() == target {
                return Some(entry.path());
            }
        }
    }
    None
}

/// Resolves an env file path.
///
/// An existing path is returned as-is. Otherwise a file with the same name
/// in any letter case is looked up next to it, so `.ENV.example` is found
/// for `.env.example`. Falls back to `path` itself.
pub fn resolve_env_file(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    path.file_name()
        .and_then(|name| find_file_case_insensitive(dir, &name.to_string_lossy()))
        .unwrap_or_else(|| path.to_path_buf())
}

/// Collects the source files of a project.
///
/// # Examples
///
/// ```rust,no_run
/// use dotenv_diff::ProjectLoader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let files = ProjectLoader::new("./my-app")
///     .with_exclude(["fixtures"])
///     .collect_source_files()?;
/// println!("{} files", files.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    root: PathBuf,
    exclude: Vec<String>,
    extensions: Vec<String>,
}

impl ProjectLoader {
    /// Loader rooted at `root` with the default extensions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Skips directories with these names, in addition to the defaults.
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    /// Replaces the scanned extensions. A leading dot is accepted. An empty
    /// list keeps the current extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(Into::into)
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    /// The scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn should_skip_dir(&self, name: &str) -> bool {
        DEFAULT_SKIP_DIRS.contains(&name) || self.exclude.iter().any(|e| e == name)
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        entry
            .file_name()
            .to_str()
            .is_none_or(|name| !self.should_skip_dir(name))
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Walks the root and reads every source file, sorted by path.
    ///
    /// Files that cannot be read as UTF-8 text are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SourceRootNotFound`] if the root is not a
    /// directory.
    pub fn collect_source_files(&self) -> LintResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(LintError::SourceRootNotFound {
                path: self.root.display().to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.keep_entry(e))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() || !self.has_source_extension(entry.path()) {
                continue;
            }
            match std::fs::read_to_string(entry.path()) {
                Ok(content) => {
                    files.push(SourceFile::new(self.relative_path(entry.path()), content))
                }
                Err(e) => log::warn!("Skipping {}: {}", entry.path().display(), e),
            }
        }
        log::debug!("Collected {} source files under {}", files.len(), self.root.display());
        Ok(files)
    }

    /// `package.json` of the root, or empty text.
    pub fn read_package_json(&self) -> String {
        read_text(&self.root.join("package.json"))
    }

    /// Reads the t3-env schema at `explicit`, or the first conventional
    /// location that exists.
    pub fn read_t3_schema(&self, explicit: Option<&Path>) -> Option<String> {
        if let Some(path) = explicit {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.root.join(path)
            };
            return Some(read_text(&path));
        }
        T3_SCHEMA_CANDIDATES
            .iter()
            .map(|candidate| self.root.join(candidate))
            .find(|path| path.is_file())
            .map(|path| {
                log::debug!("Using t3-env schema {}", path.display());
                read_text(&path)
            })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_read_text_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_text(&dir.path().join(".env")), "");
    }

    #[test]
    fn test_resolve_env_file_case_insensitive() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".ENV.Example", "A=1\n");
        let resolved = resolve_env_file(&dir.path().join(".env.example"));
        assert_eq!(read_text(&resolved), "A=1\n");
    }

    #[test]
    fn test_collect_skips_vendor_dirs_and_other_extensions() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/a.ts", "process.env.A");
        write(dir.path(), "src/b.svelte", "");
        write(dir.path(), "src/readme.md", "");
        write(dir.path(), "node_modules/pkg/index.js", "");
        write(dir.path(), "fixtures/c.js", "");

        let files = ProjectLoader::new(dir.path())
            .with_exclude(["fixtures"])
            .collect_source_files()
            .unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/a.ts", "src/b.svelte"]);
        assert_eq!(files[0].content, "process.env.A");
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.ts", "");
        write(dir.path(), "b.py", "");
        let files = ProjectLoader::new(dir.path())
            .with_extensions([".py"])
            .collect_source_files()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "b.py");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ProjectLoader::new(dir.path().join("nope"))
            .collect_source_files()
            .unwrap_err();
        assert!(matches!(err, LintError::SourceRootNotFound { .. }));
    }

    #[test]
    fn test_t3_schema_lookup() {
        let dir = TempDir::new().unwrap();
        let loader = ProjectLoader::new(dir.path());
        assert!(loader.read_t3_schema(None).is_none());
        write(dir.path(), "src/env.mjs", "server: {}");
        assert_eq!(loader.read_t3_schema(None).as_deref(), Some("server: {}"));
    }
}
